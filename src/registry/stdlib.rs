//! Standard-library ("OS") signatures, seeded into the registry before any
//! user class is parsed.
//!
//! Constructors (`String.new`, `Array.new`) are static: they are invoked
//! as `Class.new(...)`, never on a receiver.

use crate::common::{
    ast::{ReturnType, Type},
    Position,
};

use super::{GlobalRegistry, MethodSignature};

#[derive(Clone, Copy)]
enum Kind {
    Function,
    Method,
    Constructor,
}

type Entry = (&'static str, Kind, ReturnType, Vec<Type>);

fn load_class(registry: &GlobalRegistry, class_name: &str, entries: Vec<Entry>) {
    registry.register_class(class_name);

    for (name, kind, return_type, parameters) in entries {
        let signature = MethodSignature {
            return_type,
            parameters,
            is_static: !matches!(kind, Kind::Method),
            is_constructor: matches!(kind, Kind::Constructor),
            position: Position::new(0, 0),
        };
        registry
            .register_method(class_name, name, signature)
            .expect("standard library must not contain duplicate subroutines");
    }
}

#[allow(clippy::too_many_lines)]
pub(super) fn load(registry: &GlobalRegistry) {
    use Kind::{Constructor, Function, Method};
    use Type::{Boolean, Char, Int};

    let class = |name: &str| Type::Class(name.to_string());
    let of = ReturnType::Of;
    let void = ReturnType::Void;

    load_class(
        registry,
        "Math",
        vec![
            ("init", Function, void.clone(), vec![]),
            ("abs", Function, of(Int), vec![Int]),
            ("multiply", Function, of(Int), vec![Int, Int]),
            ("divide", Function, of(Int), vec![Int, Int]),
            ("min", Function, of(Int), vec![Int, Int]),
            ("max", Function, of(Int), vec![Int, Int]),
            ("sqrt", Function, of(Int), vec![Int]),
            ("bit", Function, of(Boolean), vec![Int, Int]),
        ],
    );

    load_class(
        registry,
        "String",
        vec![
            ("new", Constructor, of(class("String")), vec![Int]),
            ("dispose", Method, void.clone(), vec![]),
            ("length", Method, of(Int), vec![]),
            ("charAt", Method, of(Char), vec![Int]),
            ("setCharAt", Method, void.clone(), vec![Int, Char]),
            ("appendChar", Method, of(class("String")), vec![Char]),
            ("eraseLastChar", Method, void.clone(), vec![]),
            ("intValue", Method, of(Int), vec![]),
            ("setInt", Method, void.clone(), vec![Int]),
            ("backSpace", Function, of(Char), vec![]),
            ("doubleQuote", Function, of(Char), vec![]),
            ("newLine", Function, of(Char), vec![]),
            ("int2String", Method, void.clone(), vec![]),
        ],
    );

    load_class(
        registry,
        "Array",
        vec![
            ("new", Constructor, of(class("Array")), vec![Int]),
            ("dispose", Method, void.clone(), vec![]),
        ],
    );

    load_class(
        registry,
        "Output",
        vec![
            ("init", Function, void.clone(), vec![]),
            ("moveCursor", Function, void.clone(), vec![Int, Int]),
            ("printChar", Function, void.clone(), vec![Char]),
            ("printString", Function, void.clone(), vec![class("String")]),
            ("printInt", Function, void.clone(), vec![Int]),
            ("println", Function, void.clone(), vec![]),
            ("backSpace", Function, void.clone(), vec![]),
            ("initMap", Function, void.clone(), vec![]),
            (
                "create",
                Function,
                void.clone(),
                vec![Int, Int, Int, Int, Int, Int, Int, Int, Int, Int, Int, Int],
            ),
            ("getMap", Function, of(class("Array")), vec![Char]),
            ("incrementCursor", Function, void.clone(), vec![]),
            ("decrementCursor", Function, void.clone(), vec![]),
        ],
    );

    load_class(
        registry,
        "Screen",
        vec![
            ("init", Function, void.clone(), vec![]),
            ("clearScreen", Function, void.clone(), vec![]),
            ("setColor", Function, void.clone(), vec![Boolean]),
            ("drawPixel", Function, void.clone(), vec![Int, Int]),
            ("drawLine", Function, void.clone(), vec![Int, Int, Int, Int]),
            ("drawRectangle", Function, void.clone(), vec![Int, Int, Int, Int]),
            ("drawCircle", Function, void.clone(), vec![Int, Int, Int]),
        ],
    );

    load_class(
        registry,
        "Keyboard",
        vec![
            ("init", Function, void.clone(), vec![]),
            ("keyPressed", Function, of(Char), vec![]),
            ("readChar", Function, of(Char), vec![]),
            ("readLine", Function, of(class("String")), vec![class("String")]),
            ("readInt", Function, of(Int), vec![class("String")]),
        ],
    );

    load_class(
        registry,
        "Memory",
        vec![
            ("init", Function, void.clone(), vec![]),
            ("peek", Function, of(Int), vec![Int]),
            ("poke", Function, void.clone(), vec![Int, Int]),
            ("alloc", Function, of(Int), vec![Int]),
            ("deAlloc", Function, void.clone(), vec![class("Array")]),
        ],
    );

    load_class(
        registry,
        "Sys",
        vec![
            ("init", Function, void.clone(), vec![]),
            ("halt", Function, void.clone(), vec![]),
            ("error", Function, void.clone(), vec![Int]),
            ("wait", Function, void, vec![Int]),
        ],
    );
}
