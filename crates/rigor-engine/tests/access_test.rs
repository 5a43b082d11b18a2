//! Private, protected and friend access.

use rigor_engine::{
    Args, CallableDecl, ClassDecl, EngineConfig, FunctionDecl, Runtime, RuntimeError, Value,
};

fn runtime(classes: Vec<ClassDecl>, functions: Vec<FunctionDecl>) -> Runtime {
    let mut builder = Runtime::builder_with(EngineConfig::enforced());
    for function in functions {
        builder.function(function).unwrap();
    }
    for class in classes {
        builder.declare(class).unwrap();
    }
    builder.build().unwrap()
}

/// Class `name` whose constructor stores 0 in each of `attributes`
fn holder(name: &str, attributes: &'static [&'static str]) -> ClassDecl {
    let decl = attributes
        .iter()
        .fold(ClassDecl::new(name), |decl, attr| decl.field(attr, "int"));
    decl.constructor(
        CallableDecl::method()
            .returns("None")
            .body(move |f| {
                for attr in attributes {
                    f.set_self(attr, 0)?;
                }
                Ok(Value::None)
            }),
    )
}

/// Method that builds a fresh `target` and reads `attr` from it
fn reader(target: &'static str, attr: &'static str) -> CallableDecl {
    CallableDecl::method().returns("int").body(move |f| {
        let object = f.instantiate(target, Args::new())?;
        f.get(&object, attr)
    })
}

/// Method reading `attr` of its own receiver
fn self_reader(attr: &'static str) -> CallableDecl {
    CallableDecl::method()
        .returns("int")
        .body(move |f| f.get_self(attr))
}

fn denied(result: Result<Value, RuntimeError>, member: &str) -> bool {
    matches!(result, Err(RuntimeError::AccessModifierViolation { member: ref m, .. }) if m == member)
}

const ATTRIBUTES: &[&str] = &["attribute", "_attribute", "__attribute"];

#[test]
fn test_own_methods_read_every_level() {
    let rt = runtime(
        vec![holder("Test", ATTRIBUTES)
            .method("public", self_reader("attribute"))
            .method("protected", self_reader("_attribute"))
            .method("private", self_reader("__attribute"))],
        vec![],
    );
    let main = rt.main();
    let test = main.instantiate("Test", Args::new()).unwrap();
    for method in ["public", "protected", "private"] {
        assert_eq!(main.call(&test, method, Args::new()), Ok(Value::Int(0)));
    }
}

#[test]
fn test_top_level_reads_only_public() {
    let rt = runtime(vec![holder("Test", ATTRIBUTES)], vec![]);
    let main = rt.main();
    let test = main.instantiate("Test", Args::new()).unwrap();

    assert_eq!(main.get(&test, "attribute"), Ok(Value::Int(0)));
    assert!(denied(main.get(&test, "_attribute"), "_attribute"));
    assert!(denied(main.get(&test, "__attribute"), "__attribute"));
}

#[test]
fn test_unrelated_class_and_function_denied() {
    let rt = runtime(
        vec![
            holder("Test", ATTRIBUTES),
            ClassDecl::new("Stranger")
                .method("protected", reader("Test", "_attribute"))
                .method("private", reader("Test", "__attribute")),
        ],
        vec![FunctionDecl::new(
            "snoop",
            CallableDecl::function().returns("int").body(|f| {
                let test = f.instantiate("Test", Args::new())?;
                f.get(&test, "_attribute")
            }),
        )],
    );
    let main = rt.main();
    let stranger = main.instantiate("Stranger", Args::new()).unwrap();

    assert!(denied(main.call(&stranger, "protected", Args::new()), "_attribute"));
    assert!(denied(main.call(&stranger, "private", Args::new()), "__attribute"));
    assert!(denied(main.call_function("snoop", Args::new()), "_attribute"));
}

#[test]
fn test_subclass_reads_protected_but_not_private() {
    let rt = runtime(
        vec![
            holder("Base", &["_x", "__x"]),
            ClassDecl::new("Derived")
                .extends("Base")
                .method("read_protected", self_reader("_x"))
                .method("read_private", self_reader("__x")),
        ],
        vec![],
    );
    let main = rt.main();
    let derived = main.instantiate("Derived", Args::new()).unwrap();

    assert_eq!(
        main.call(&derived, "read_protected", Args::new()),
        Ok(Value::Int(0))
    );
    assert_eq!(
        main.call(&derived, "read_private", Args::new()),
        Err(RuntimeError::AccessModifierViolation {
            class: "Derived".to_string(),
            member: "__x".to_string(),
        })
    );
}

#[test]
fn test_subclass_receiver_denied_protected_of_base_object() {
    let rt = runtime(
        vec![
            holder("Base", &["_x"]),
            ClassDecl::new("Derived")
                .extends("Base")
                .method("peek", reader("Base", "_x")),
        ],
        vec![],
    );
    let main = rt.main();
    let derived = main.instantiate("Derived", Args::new()).unwrap();
    // The receiver's class must appear in the object's resolution order
    assert!(denied(main.call(&derived, "peek", Args::new()), "_x"));
}

#[test]
fn test_base_method_reads_protected_of_subclass_object() {
    let rt = runtime(
        vec![
            holder("Base", &["_x", "__x"])
                .method("peek_protected", reader("Derived", "_x"))
                .method("peek_private", reader("Derived", "__x")),
            ClassDecl::new("Derived").extends("Base"),
        ],
        vec![],
    );
    let main = rt.main();
    let base = main.instantiate("Base", Args::new()).unwrap();

    assert_eq!(
        main.call(&base, "peek_protected", Args::new()),
        Ok(Value::Int(0))
    );
    assert_eq!(
        main.call(&base, "peek_private", Args::new()),
        Err(RuntimeError::AccessModifierViolation {
            class: "Derived".to_string(),
            member: "__x".to_string(),
        })
    );
}

#[test]
fn test_friend_class() {
    let rt = runtime(
        vec![
            holder("Test", ATTRIBUTES).friend("Friend"),
            ClassDecl::new("Friend")
                .method("protected", reader("Test", "_attribute"))
                .method("private", reader("Test", "__attribute")),
        ],
        vec![],
    );
    let main = rt.main();
    let friend = main.instantiate("Friend", Args::new()).unwrap();
    assert_eq!(main.call(&friend, "protected", Args::new()), Ok(Value::Int(0)));
    assert_eq!(main.call(&friend, "private", Args::new()), Ok(Value::Int(0)));
}

#[test]
fn test_friend_method() {
    let rt = runtime(
        vec![
            holder("Test", ATTRIBUTES).friend("Friend.method"),
            ClassDecl::new("Friend")
                .method("method", reader("Test", "__attribute"))
                .method("other", reader("Test", "__attribute")),
        ],
        vec![],
    );
    let main = rt.main();
    let friend = main.instantiate("Friend", Args::new()).unwrap();
    assert_eq!(main.call(&friend, "method", Args::new()), Ok(Value::Int(0)));
    assert!(denied(main.call(&friend, "other", Args::new()), "__attribute"));
}

#[test]
fn test_friend_method_keyed_by_receiver_type() {
    let rt = runtime(
        vec![
            holder("Test", ATTRIBUTES).friend_method("Friend", "method"),
            ClassDecl::new("Friend").method("method", reader("Test", "_attribute")),
            ClassDecl::new("Child").extends("Friend"),
        ],
        vec![],
    );
    let main = rt.main();
    let friend = main.instantiate("Friend", Args::new()).unwrap();
    assert_eq!(main.call(&friend, "method", Args::new()), Ok(Value::Int(0)));

    // Inherited by Child, but invoked on a Child receiver
    let child = main.instantiate("Child", Args::new()).unwrap();
    assert!(denied(main.call(&child, "method", Args::new()), "_attribute"));
}

#[test]
fn test_friend_function() {
    let read = |attr: &'static str| {
        CallableDecl::function().returns("int").body(move |f| {
            let test = f.instantiate("Test", Args::new())?;
            f.get(&test, attr)
        })
    };
    let rt = runtime(
        vec![holder("Test", ATTRIBUTES).friend("function")],
        vec![
            FunctionDecl::new("function", read("__attribute")),
            FunctionDecl::new("other", read("__attribute")),
        ],
    );
    let main = rt.main();
    assert_eq!(main.call_function("function", Args::new()), Ok(Value::Int(0)));
    assert!(denied(main.call_function("other", Args::new()), "__attribute"));
}

#[test]
fn test_friendship_is_inherited() {
    let rt = runtime(
        vec![
            holder("Test", ATTRIBUTES).friend("function"),
            ClassDecl::new("Derived").extends("Test").constructor(
                CallableDecl::method().returns("None").body(|f| {
                    f.call_super("__init__", Args::new())?;
                    Ok(Value::None)
                }),
            ),
        ],
        vec![FunctionDecl::new(
            "function",
            CallableDecl::function().returns("int").body(|f| {
                let derived = f.instantiate("Derived", Args::new())?;
                f.get(&derived, "_attribute")
            }),
        )],
    );
    assert_eq!(
        rt.main().call_function("function", Args::new()),
        Ok(Value::Int(0))
    );
}

#[test]
fn test_private_method_calls() {
    let rt = runtime(
        vec![ClassDecl::new("Test")
            .method(
                "__secret",
                CallableDecl::method()
                    .returns("int")
                    .body(|_| Ok(Value::Int(7))),
            )
            .method(
                "reveal",
                CallableDecl::method()
                    .returns("int")
                    .body(|f| f.call_self("__secret", Args::new())),
            )],
        vec![],
    );
    let main = rt.main();
    let test = main.instantiate("Test", Args::new()).unwrap();
    assert_eq!(main.call(&test, "reveal", Args::new()), Ok(Value::Int(7)));
    assert!(denied(main.call(&test, "__secret", Args::new()), "__secret"));
}

#[test]
fn test_reflection_bypasses_access() {
    let rt = runtime(vec![holder("Test", ATTRIBUTES)], vec![]);
    let test = rt.main().instantiate("Test", Args::new()).unwrap();

    assert_eq!(rt.reflect().get(&test, "__attribute"), Ok(Value::Int(0)));
    assert_eq!(rt.reflect().get(&test, "_attribute"), Ok(Value::Int(0)));

    let slots = rt.introspect(&test);
    assert_eq!(slots.len(), 3);
    assert!(slots
        .iter()
        .any(|(key, value)| key.to_string() == "Test::__attribute" && *value == Value::Int(0)));
}
