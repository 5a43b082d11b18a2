//! Attribute writes: declared types, const attributes and defaults.

use rigor_engine::{
    Args, CallableDecl, ClassDecl, EngineConfig, Runtime, RuntimeError, Value,
};

fn runtime(classes: Vec<ClassDecl>) -> Runtime {
    let mut builder = Runtime::builder_with(EngineConfig::enforced());
    for class in classes {
        builder.declare(class).unwrap();
    }
    builder.build().unwrap()
}

fn setter(attr: &'static str, value: Value) -> CallableDecl {
    CallableDecl::method().returns("None").body(move |f| {
        f.set_self(attr, value.clone())?;
        Ok(Value::None)
    })
}

fn const_violation(result: Result<impl std::fmt::Debug, RuntimeError>) -> bool {
    matches!(result, Err(RuntimeError::ConstModifierViolation { .. }))
}

fn account() -> ClassDecl {
    ClassDecl::new("Account")
        .field("id", "const[int]")
        .field("balance", "int")
        .constructor(
            CallableDecl::method()
                .param("id", "int")
                .returns("None")
                .body(|f| {
                    f.set_self("id", f.arg("id")?.clone())?;
                    f.set_self("balance", 0)?;
                    Ok(Value::None)
                }),
        )
        .method("reset", setter("id", Value::Int(0)))
}

#[test]
fn test_type_mismatch_keeps_prior_value() {
    let rt = runtime(vec![account()]);
    let main = rt.main();
    let account = main.instantiate("Account", Args::positional([1])).unwrap();

    main.set(&account, "balance", 10).unwrap();
    let err = main.set(&account, "balance", "ten").unwrap_err();
    assert_eq!(
        err,
        RuntimeError::TypeMismatch {
            context: "attribute 'Account.balance'".to_string(),
            expected: "int".to_string(),
            actual: "str".to_string(),
        }
    );
    assert_eq!(main.get(&account, "balance"), Ok(Value::Int(10)));
}

#[test]
fn test_undeclared_attribute_write() {
    let rt = runtime(vec![account()]);
    let main = rt.main();
    let account = main.instantiate("Account", Args::positional([1])).unwrap();
    assert_eq!(
        main.set(&account, "owner", "alice"),
        Err(RuntimeError::MissingAttributeTypeAnnotation {
            class: "Account".to_string(),
            attribute: "owner".to_string(),
        })
    );
}

#[test]
fn test_const_set_once_in_constructor() {
    let rt = runtime(vec![account()]);
    let main = rt.main();
    let account = main.instantiate("Account", Args::positional([7])).unwrap();
    assert_eq!(main.get(&account, "id"), Ok(Value::Int(7)));

    assert!(const_violation(main.set(&account, "id", 8)));
    assert!(const_violation(main.call(&account, "reset", Args::new())));
    assert_eq!(main.get(&account, "id"), Ok(Value::Int(7)));
}

#[test]
fn test_const_type_still_checked() {
    let rt = runtime(vec![ClassDecl::new("Tag")
        .field("id", "const[int]")
        .constructor(setter("id", Value::str("x")))]);
    let err = rt.main().instantiate("Tag", Args::new()).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::TypeMismatch {
            context: "attribute 'Tag.id'".to_string(),
            expected: "int".to_string(),
            actual: "str".to_string(),
        }
    );
}

#[test]
fn test_const_second_write_in_constructor() {
    let rt = runtime(vec![ClassDecl::new("Twice")
        .field("id", "final[int]")
        .constructor(CallableDecl::method().returns("None").body(|f| {
            f.set_self("id", 1)?;
            f.set_self("id", 2)?;
            Ok(Value::None)
        }))]);
    assert!(const_violation(rt.main().instantiate("Twice", Args::new())));
}

#[test]
fn test_constructor_reentry_cannot_rewrite_const() {
    let rt = runtime(vec![account()]);
    let main = rt.main();
    let account = main.instantiate("Account", Args::positional([1])).unwrap();
    assert!(const_violation(main.call(
        &account,
        "__init__",
        Args::positional([2])
    )));
    assert_eq!(main.get(&account, "id"), Ok(Value::Int(1)));
}

#[test]
fn test_base_constructor_sets_const_for_subclass() {
    let rt = runtime(vec![
        account(),
        ClassDecl::new("Savings").extends("Account").constructor(
            CallableDecl::method()
                .param("id", "int")
                .returns("None")
                .body(|f| {
                    f.call_super("__init__", Args::new().arg(f.arg("id")?.clone()))?;
                    Ok(Value::None)
                }),
        ),
        ClassDecl::new("Checking").extends("Account"),
        ClassDecl::new("Rewriting").extends("Account").constructor(
            CallableDecl::method().returns("None").body(|f| {
                f.call_super("__init__", Args::positional([1]))?;
                f.set_self("id", 2)?;
                Ok(Value::None)
            }),
        ),
    ]);
    let main = rt.main();

    let savings = main.instantiate("Savings", Args::positional([3])).unwrap();
    assert_eq!(main.get(&savings, "id"), Ok(Value::Int(3)));

    let checking = main.instantiate("Checking", Args::positional([4])).unwrap();
    assert_eq!(main.get(&checking, "id"), Ok(Value::Int(4)));

    assert!(const_violation(main.instantiate("Rewriting", Args::new())));
}

#[test]
fn test_class_level_defaults() {
    let rt = runtime(vec![ClassDecl::new("Counter")
        .field_with_default("count", "int", 5)
        .field_with_default("label", "optional[str]", Value::None)
        .value("LIMIT", 10)
        .field("LIMIT", "int")]);
    let main = rt.main();
    let counter = main.instantiate("Counter", Args::new()).unwrap();

    assert_eq!(main.get(&counter, "count"), Ok(Value::Int(5)));
    assert_eq!(main.get(&counter, "label"), Ok(Value::None));
    assert_eq!(main.get(&counter, "LIMIT"), Ok(Value::Int(10)));

    main.set(&counter, "count", 6).unwrap();
    assert_eq!(main.get(&counter, "count"), Ok(Value::Int(6)));
    main.set(&counter, "label", "ticks").unwrap();

    // The default stays on the class
    let fresh = main.instantiate("Counter", Args::new()).unwrap();
    assert_eq!(main.get(&fresh, "count"), Ok(Value::Int(5)));
}

#[test]
fn test_private_write_from_subclass_is_its_own_slot() {
    let rt = runtime(vec![
        ClassDecl::new("Base")
            .field("__x", "int")
            .constructor(setter("__x", Value::Int(1))),
        ClassDecl::new("Derived")
            .extends("Base")
            .method("clobber", setter("__x", Value::Int(2))),
    ]);
    let main = rt.main();
    let derived = main.instantiate("Derived", Args::new()).unwrap();

    assert_eq!(
        main.call(&derived, "clobber", Args::new()),
        Err(RuntimeError::MissingAttributeTypeAnnotation {
            class: "Derived".to_string(),
            attribute: "__x".to_string(),
        })
    );
    assert_eq!(rt.reflect().get(&derived, "__x"), Ok(Value::Int(1)));
}

#[test]
fn test_undeclared_private_read() {
    let rt = runtime(vec![ClassDecl::new("Test").method(
        "peek",
        CallableDecl::method()
            .returns("int")
            .body(|f| f.get_self("__missing")),
    )]);
    let main = rt.main();
    let test = main.instantiate("Test", Args::new()).unwrap();
    assert!(matches!(
        main.call(&test, "peek", Args::new()),
        Err(RuntimeError::UndefinedMember { .. })
    ));
}

#[test]
fn test_object_valued_attribute() {
    let rt = runtime(vec![
        ClassDecl::new("Node").field("next", "optional[Node]"),
        ClassDecl::new("Leaf"),
    ]);
    let main = rt.main();
    let first = main.instantiate("Node", Args::new()).unwrap();
    let second = main.instantiate("Node", Args::new()).unwrap();
    let leaf = main.instantiate("Leaf", Args::new()).unwrap();

    main.set(&first, "next", &second).unwrap();
    main.set(&second, "next", Value::None).unwrap();
    assert!(matches!(
        main.set(&first, "next", &leaf),
        Err(RuntimeError::TypeMismatch { .. })
    ));

    let next = main.get(&first, "next").unwrap();
    assert_eq!(main.get(&next, "next"), Ok(Value::None));
    assert!(matches!(
        main.get(&Value::Int(1), "next"),
        Err(RuntimeError::TypeMismatch { ref expected, .. }) if expected == "object"
    ));
}
