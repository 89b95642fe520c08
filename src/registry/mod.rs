//! Compilation-wide table of known classes and subroutine signatures.
//!
//! Written concurrently by the parse tasks, then read (frozen) by the
//! analyse and generate phases; the driver's phase barrier provides the
//! happens-before edge. Critical sections are one insert or one lookup.
//! Ordered maps keep the JSON dump independent of insertion order.

mod stdlib;

use std::{
    collections::{BTreeMap, BTreeSet},
    fs, io,
    path::Path,
    sync::Mutex,
};

use crate::common::{
    ast::{ReturnType, Type},
    Position,
};

/// Signature of a single subroutine, as recorded at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub return_type: ReturnType,
    pub parameters: Vec<Type>,
    /// Set for functions and constructors; both are invoked as
    /// `ClassName.name(...)` rather than on a receiver.
    pub is_static: bool,
    pub is_constructor: bool,
    pub position: Position,
}

/// Returned when a subroutine name is registered twice within one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateMethod {
    pub class_name: String,
    pub method_name: String,
    pub previous: Position,
}

#[derive(Debug)]
pub struct GlobalRegistry {
    classes: Mutex<BTreeSet<String>>,
    methods: Mutex<BTreeMap<String, BTreeMap<String, MethodSignature>>>,
}

impl GlobalRegistry {
    /// An empty registry pre-seeded with the standard-library surface.
    pub fn new() -> Self {
        let registry = Self {
            classes: Mutex::new(BTreeSet::new()),
            methods: Mutex::new(BTreeMap::new()),
        };
        stdlib::load(&registry);
        registry
    }

    /// Insert a class name; `false` when the name was already registered
    /// (the caller reports the duplicate at its own position).
    pub fn register_class(&self, name: &str) -> bool {
        self.classes
            .lock()
            .expect("registry class set lock poisoned")
            .insert(name.to_string())
    }

    pub fn register_method(
        &self,
        class_name: &str,
        method_name: &str,
        signature: MethodSignature,
    ) -> Result<(), DuplicateMethod> {
        let mut methods = self.methods.lock().expect("registry method map lock poisoned");
        let class_methods = methods.entry(class_name.to_string()).or_default();

        if let Some(existing) = class_methods.get(method_name) {
            return Err(DuplicateMethod {
                class_name: class_name.to_string(),
                method_name: method_name.to_string(),
                previous: existing.position,
            });
        }

        class_methods.insert(method_name.to_string(), signature);
        Ok(())
    }

    pub fn class_exists(&self, name: &str) -> bool {
        self.classes
            .lock()
            .expect("registry class set lock poisoned")
            .contains(name)
    }

    /// True for every registered class; the built-in primitives always
    /// exist for type-checking purposes.
    pub fn type_exists(&self, declared: &Type) -> bool {
        match declared {
            Type::Int | Type::Char | Type::Boolean => true,
            Type::Class(name) => self.class_exists(name),
        }
    }

    pub fn method_exists(&self, class_name: &str, method_name: &str) -> bool {
        self.methods
            .lock()
            .expect("registry method map lock poisoned")
            .get(class_name)
            .is_some_and(|class_methods| class_methods.contains_key(method_name))
    }

    pub fn get_signature(&self, class_name: &str, method_name: &str) -> Option<MethodSignature> {
        self.methods
            .lock()
            .expect("registry method map lock poisoned")
            .get(class_name)
            .and_then(|class_methods| class_methods.get(method_name))
            .cloned()
    }

    /// External visualization hook; not part of compilation correctness.
    pub fn dump_to_json(&self, path: &Path) -> io::Result<()> {
        let methods = self.methods.lock().expect("registry method map lock poisoned");

        let mut entries = Vec::new();
        for (class_name, class_methods) in methods.iter() {
            for (method_name, signature) in class_methods {
                let params = signature
                    .parameters
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");

                entries.push(format!(
                    concat!(
                        "    {{\n",
                        "      \"class\": \"{}\",\n",
                        "      \"method\": \"{}\",\n",
                        "      \"type\": \"{}\",\n",
                        "      \"return\": \"{}\",\n",
                        "      \"params\": \"{}\"\n",
                        "    }}"
                    ),
                    class_name,
                    method_name,
                    if signature.is_static { "function" } else { "method" },
                    signature.return_type,
                    params,
                ));
            }
        }

        let json = format!("{{\n  \"registry\": [\n{}\n  ]\n}}\n", entries.join(",\n"));
        fs::write(path, json)
    }
}

impl Default for GlobalRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{GlobalRegistry, MethodSignature};
    use crate::common::{
        ast::{ReturnType, Type},
        Position,
    };

    fn signature(return_type: ReturnType, parameters: Vec<Type>) -> MethodSignature {
        MethodSignature {
            return_type,
            parameters,
            is_static: true,
            is_constructor: false,
            position: Position::new(4, 5),
        }
    }

    #[test]
    fn test_standard_library_is_seeded() {
        let registry = GlobalRegistry::new();

        for class in ["Math", "String", "Array", "Output", "Screen", "Keyboard", "Memory", "Sys"] {
            assert!(registry.class_exists(class), "{class} should be seeded");
        }

        let multiply = registry
            .get_signature("Math", "multiply")
            .expect("Math.multiply should be seeded");
        assert!(multiply.is_static);
        assert_eq!(multiply.return_type, ReturnType::Of(Type::Int));
        assert_eq!(multiply.parameters, vec![Type::Int, Type::Int]);

        let append_char = registry
            .get_signature("String", "appendChar")
            .expect("String.appendChar should be seeded");
        assert!(!append_char.is_static);

        let array_new = registry
            .get_signature("Array", "new")
            .expect("Array.new should be seeded");
        assert!(array_new.is_static);
        assert!(array_new.is_constructor);
    }

    #[test]
    fn test_primitive_types_always_exist() {
        let registry = GlobalRegistry::new();

        assert!(registry.type_exists(&Type::Int));
        assert!(registry.type_exists(&Type::Char));
        assert!(registry.type_exists(&Type::Boolean));
        assert!(!registry.type_exists(&Type::Class("Alien".to_string())));
    }

    #[test]
    fn test_register_class_rejects_duplicates() {
        let registry = GlobalRegistry::new();

        assert!(registry.register_class("Game"));
        assert!(!registry.register_class("Game"));
        // colliding with a seeded class is the same failure
        assert!(!registry.register_class("Math"));
    }

    #[test]
    fn test_register_method_rejects_duplicates_within_a_class() {
        let registry = GlobalRegistry::new();
        registry.register_class("Game");

        assert!(registry
            .register_method("Game", "run", signature(ReturnType::Void, vec![]))
            .is_ok());

        let duplicate = registry
            .register_method("Game", "run", signature(ReturnType::Of(Type::Int), vec![]))
            .expect_err("second registration should fail");
        assert_eq!(duplicate.previous, Position::new(4, 5));

        // same name in another class is fine
        registry.register_class("Board");
        assert!(registry
            .register_method("Board", "run", signature(ReturnType::Void, vec![]))
            .is_ok());
    }

    #[test]
    fn test_json_dump_lists_the_registry() {
        let registry = GlobalRegistry::new();
        registry.register_class("Game");
        registry
            .register_method(
                "Game",
                "run",
                signature(ReturnType::Void, vec![Type::Int, Type::Boolean]),
            )
            .expect("registration should succeed");

        let path = std::env::temp_dir().join(format!("jackc_registry_{}.json", std::process::id()));
        registry.dump_to_json(&path).expect("dump should write");
        let dump = std::fs::read_to_string(&path).expect("dump should read back");
        std::fs::remove_file(&path).ok();

        assert!(dump.contains("\"class\": \"Game\""));
        assert!(dump.contains("\"method\": \"run\""));
        assert!(dump.contains("\"type\": \"function\""));
        assert!(dump.contains("\"params\": \"int, boolean\""));
        assert!(dump.contains("\"return\": \"void\""));
    }
}
