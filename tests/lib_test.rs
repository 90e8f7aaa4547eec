//! Library integration tests.

use configvar::{ConfigVarError, Context, SystemEnv};

#[test]
fn error_types_are_public() {
    let err = ConfigVarError::NoSuchValue {
        name: "test".into(),
    };
    assert!(err.to_string().contains("test"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> configvar::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn resolves_from_environment_snapshot() {
    let env: SystemEnv = [("CONFIGVAR_LIB_TEST_PORT", "7070"), ("HOST", "localhost")]
        .into_iter()
        .collect();

    let config = Context::define(&env, |c| {
        c.register_required_int("configvar_lib_test_port")?;
        c.register_required_string("host")?;
        c.register_optional_bool("debug", Some(false))?;
        Ok(())
    })
    .unwrap();

    assert_eq!(config.get_int("configvar_lib_test_port").unwrap(), 7070);
    assert_eq!(config.get_str("host").unwrap(), "localhost");
    assert!(!config.get_bool("debug").unwrap());
}

#[test]
fn resolved_context_is_shareable_across_threads() {
    let mut context = Context::new();
    context.register_optional_int("workers", Some(4)).unwrap();
    context.reload(&[("WORKERS", "8")]).unwrap();

    let shared = std::sync::Arc::new(context);
    let handle = {
        let shared = std::sync::Arc::clone(&shared);
        std::thread::spawn(move || shared.get_int("workers").unwrap())
    };
    assert_eq!(handle.join().unwrap(), 8);
}
