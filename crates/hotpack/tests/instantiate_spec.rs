mod common;

use std::rc::Rc;

use common::{ids, record, Harness};
use hotpack::{module_factory, MissingFactoryError, ModuleContext, ModuleError, RuntimeOptions};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_instantiation_is_idempotent() {
  let harness = Harness::new();
  harness.register("main.js", vec![
    ("1", harness.requiring("1", &["2", "2"])),
    ("2", harness.leaf("2", json!(2))),
  ]);

  let first = harness.start("1", "main.js").unwrap();
  let second = harness.start("1", "main.js").unwrap();
  assert!(Rc::ptr_eq(&first, &second));
  assert!(first.is_loaded());
  assert!(first.error().is_none());

  let two = harness.runtime.module(&"2".into()).unwrap();
  assert!(two.is_loaded());
  assert_eq!(two.exports().get("value"), Some(json!(2)));
  assert_eq!(harness.events(), vec!["1", "2"]);
  assert!(harness.runtime.is_runtime_module(&"1".into()));
  assert!(!harness.runtime.is_runtime_module(&"2".into()));
}

#[test]
fn test_import_edges_are_recorded_both_ways() {
  let harness = Harness::new();
  harness.register("main.js", vec![
    ("1", harness.requiring("1", &["2", "3"])),
    ("2", harness.requiring("2", &["3"])),
    ("3", harness.leaf("3", json!(3))),
  ]);
  harness.start("1", "main.js").unwrap();

  let runtime = &harness.runtime;
  assert_eq!(runtime.module(&"1".into()).unwrap().children(), ids(&["2", "3"]));
  assert_eq!(runtime.module(&"1".into()).unwrap().parents(), ids(&[]));
  assert_eq!(runtime.module(&"3".into()).unwrap().parents(), ids(&["2", "1"]));
  assert_eq!(harness.events(), vec!["1", "2", "3"]);
}

#[test]
fn test_factory_error_is_sticky() {
  let harness = Harness::new();
  let log = Rc::clone(&harness.log);
  harness.register("main.js", vec![(
    "broken",
    module_factory(move |_ctx: &ModuleContext| {
      record(&log, "broken");
      anyhow::bail!("top level throw")
    }),
  )]);

  let err = harness.start("broken", "main.js").unwrap_err();
  assert_eq!(err.to_string(), "Module broken failed to execute: top level throw");
  let first = err.downcast::<ModuleError>().unwrap();

  let err = harness.start("broken", "main.js").unwrap_err();
  let second = err.downcast_ref::<ModuleError>().unwrap();
  assert!(first.ptr_eq(second));

  let module = harness.runtime.module(&"broken".into()).unwrap();
  assert!(!module.is_loaded());
  assert!(module.error().is_some());
  // The factory ran exactly once.
  assert_eq!(harness.events(), vec!["broken"]);
}

#[test]
fn test_importer_sees_sticky_error() {
  let harness = Harness::new();
  harness.register("main.js", vec![
    ("1", harness.requiring("1", &["broken"])),
    ("broken", module_factory(|_ctx: &ModuleContext| anyhow::bail!("nope"))),
  ]);

  let err = harness.start("1", "main.js").unwrap_err();
  assert_eq!(err.to_string(), "Module 1 failed to execute: Module broken failed to execute: nope");
  assert!(harness.runtime.module(&"1".into()).unwrap().error().is_some());
}

#[test]
fn test_missing_factory_names_the_source() {
  let harness = Harness::new();
  harness.register("main.js", vec![("1", harness.requiring("1", &["gone"]))]);

  let err = harness.start("1", "main.js").unwrap_err();
  let module_error = err.downcast_ref::<ModuleError>().unwrap();
  let missing = module_error.cause().downcast_ref::<MissingFactoryError>().unwrap();
  assert_eq!(
    missing.to_string(),
    "Module gone was instantiated because it was required from module 1, but the module factory is not available. It might have been deleted in an HMR update."
  );

  let err = harness.start("unknown", "main.js").unwrap_err();
  assert_eq!(
    err.to_string(),
    "Module unknown was instantiated as a runtime entry of chunk main.js, but the module factory is not available. It might have been deleted in an HMR update."
  );
}

#[test]
fn test_cycle_sees_partial_exports() {
  let harness = Harness::new();
  let log = Rc::clone(&harness.log);
  let a = module_factory(move |ctx: &ModuleContext| {
    ctx.exports().set("early", json!(true));
    let b = ctx.require("b")?;
    record(&log, format!("a saw b.done = {}", b.get("done").unwrap_or_default()));
    ctx.exports().set("late", json!(true));
    Ok(())
  });
  let log = Rc::clone(&harness.log);
  let b = module_factory(move |ctx: &ModuleContext| {
    let a = ctx.require("a")?;
    record(&log, format!("b saw a.early = {}, a.late = {:?}", a.get("early").unwrap_or_default(), a.get("late")));
    ctx.exports().set("done", json!(true));
    Ok(())
  });
  harness.register("main.js", vec![("a", a), ("b", b)]);

  harness.start("a", "main.js").unwrap();
  assert_eq!(harness.events(), vec!["b saw a.early = true, a.late = None", "a saw b.done = true"]);
  assert_eq!(harness.runtime.module(&"a".into()).unwrap().parents(), ids(&["b"]));
}

#[test]
fn test_import_builds_interop_namespace() {
  let harness = Harness::new();
  let log = Rc::clone(&harness.log);
  let importer = module_factory(move |ctx: &ModuleContext| {
    let cjs = ctx.import("cjs")?;
    let esm = ctx.import("esm")?;
    record(&log, format!("cjs default = {}", cjs.get("default").unwrap_or_default()));
    record(&log, format!("cjs name = {}", cjs.get("name").unwrap_or_default()));
    record(&log, format!("esm default = {}", esm.get("default").unwrap_or_default()));
    Ok(())
  });
  let cjs = module_factory(|ctx: &ModuleContext| {
    ctx.exports().set("name", json!("cjs"));
    Ok(())
  });
  let esm = module_factory(|ctx: &ModuleContext| {
    ctx.esm_export([("default", json!("esm default")), ("named", json!(1))]);
    Ok(())
  });
  harness.register("main.js", vec![("importer", importer), ("cjs", cjs), ("esm", esm)]);

  harness.start("importer", "main.js").unwrap();
  assert_eq!(harness.events(), vec![
    r#"cjs default = {"name":"cjs"}"#,
    r#"cjs name = "cjs""#,
    r#"esm default = "esm default""#,
  ]);

  let esm = harness.runtime.module(&"esm".into()).unwrap();
  assert!(esm.namespace_object().unwrap().ptr_eq(&esm.exports()));
}

#[test]
fn test_asset_paths_resolve_against_asset_root() {
  let harness = Harness::with_options(RuntimeOptions {
    asset_root: Some("/srv/app".to_string()),
    ..Default::default()
  });
  let log = Rc::clone(&harness.log);
  let page = module_factory(move |ctx: &ModuleContext| {
    record(&log, ctx.resolve_absolute_path(Some("images/logo.png")));
    record(&log, ctx.resolve_absolute_path(None));
    record(&log, ctx.resolve_path_from_module("logo")?);
    record(&log, ctx.resolve_path_from_module("icon")?);
    Ok(())
  });
  let logo = module_factory(|ctx: &ModuleContext| {
    ctx.export_value(json!("/_next/static/logo.123.png"));
    Ok(())
  });
  let icon = module_factory(|ctx: &ModuleContext| {
    ctx.esm_export([("default", json!("/_next/static/icon.456.svg"))]);
    Ok(())
  });
  harness.register("main.js", vec![("page", page), ("logo", logo), ("icon", icon)]);

  harness.start("page", "main.js").unwrap();
  assert_eq!(harness.events(), vec![
    "/srv/app/images/logo.png",
    "/srv/app/",
    "/_next/static/logo.123.png",
    "/_next/static/icon.456.svg",
  ]);
}

#[test]
fn test_reexports_and_namespace_replacement() {
  let harness = Harness::new();
  let log = Rc::clone(&harness.log);
  let barrel = module_factory(move |ctx: &ModuleContext| {
    ctx.esm_export([("own", json!("barrel"))]);
    let utils = ctx.require("utils")?;
    ctx.dynamic_export(&utils);
    record(&log, ctx.dirname());
    Ok(())
  });
  let utils = module_factory(|ctx: &ModuleContext| {
    let namespace = hotpack::Exports::from_value(json!({ "own": "utils", "helper": 1, "default": 2 }));
    ctx.export_namespace(namespace);
    Ok(())
  });
  harness.register("main.js", vec![("[project]/lib//", barrel), ("utils", utils)]);

  let barrel = harness.start("[project]/lib//", "main.js").unwrap();
  let exports = barrel.exports();
  assert_eq!(exports.get("own"), Some(json!("barrel")));
  assert_eq!(exports.get("helper"), Some(json!(1)));
  assert_eq!(exports.get("default"), None);
  assert_eq!(harness.events(), vec!["[project]/lib"]);

  let utils = harness.runtime.module(&"utils".into()).unwrap();
  assert!(utils.namespace_object().unwrap().ptr_eq(&utils.exports()));
}
