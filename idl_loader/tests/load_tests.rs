use idl_loader::idl_types::{Definition, KindClass, TypeRef};
use idl_loader::{load_schema, load_schema_str, LinkError, LoadError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write schema file");
    path
}

const COMMON: &str = r#"
modules:
  - name: Common
    definitions:
      - enum: { name: ErrorCode, enumerators: [e_EC_SUCCESS, e_EC_INVALID_SERVICE_CODE] }
      - struct:
          name: Version
          members:
            - { name: major, type: { primitive: octet } }
            - { name: minor, type: { primitive: octet } }
"#;

const DEMO: &str = r#"
imports: [common.yaml]
modules:
  - name: Demo
    definitions:
      - typedef: { name: Versions, type: { sequence: { declared: "Common::Version" } } }
    interfaces:
      - name: Services
        operations:
          - name: version
            returns: { declared: "Common::ErrorCode" }
            parameters:
              - { name: current, type: { declared: "Common::Version" }, direction: out }
"#;

#[test]
fn load_schema_links_across_imports() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "common.yaml", COMMON);
    let main = write(dir.path(), "demo.yaml", DEMO);

    let schema = load_schema(&[main], &[]).expect("schema should load");

    // Imported modules come first and do not generate
    let all: Vec<&str> = schema.modules.iter().map(|m| m.module.name.as_str()).collect();
    assert_eq!(all, vec!["Common", "Demo"]);
    let main_names: Vec<&str> = schema.main_modules().map(|m| m.module.name.as_str()).collect();
    assert_eq!(main_names, vec!["Demo"], "only the named file is a main file");

    let demo = &schema.find_module("Demo").expect("Demo module").module;
    match &demo.definitions[0] {
        Definition::Typedef(def) => {
            assert_eq!(def.scoped_name.to_string(), "Demo::Versions");
            match &def.alias {
                TypeRef::Sequence(element) => {
                    assert_eq!(element.kind_class(), Some(KindClass::Struct))
                }
                other => panic!("expected sequence, got {:?}", other),
            }
        }
        other => panic!("expected typedef, got {:?}", other),
    }

    let op = &demo.interfaces[0].operations[0];
    assert_eq!(op.returns.kind_class(), Some(KindClass::Enum));
    assert_eq!(op.parameters[0].param_type.kind_class(), Some(KindClass::Struct));
}

#[test]
fn unknown_type_surfaces_as_link_error() {
    let dir = TempDir::new().unwrap();
    let main = write(
        dir.path(),
        "demo.yaml",
        "modules:\n  - name: Demo\n    definitions:\n      - typedef: { name: T, type: { declared: Missing } }\n",
    );

    match load_schema(&[main], &[]) {
        Err(LoadError::Link(LinkError::UnknownType { name, context })) => {
            assert_eq!(name, "Missing");
            assert_eq!(context, "Demo::T");
        }
        other => panic!("expected link error, got {:?}", other),
    }
}

#[test]
fn malformed_yaml_names_the_file() {
    let dir = TempDir::new().unwrap();
    let main = write(
        dir.path(),
        "broken.yaml",
        "modules:\n  - name: Demo\n    definitions:\n      - union: { name: U }\n",
    );

    let err = load_schema(&[main], &[]).unwrap_err();
    assert!(matches!(err, LoadError::Yaml { .. }), "got {:?}", err);
    assert!(err.to_string().contains("broken.yaml"), "message was: {}", err);
}

#[test]
fn in_memory_schema_rejects_imports() {
    let err = load_schema_str(DEMO, Path::new("demo.yaml")).unwrap_err();
    assert!(matches!(err, LoadError::ImportNotFound { .. }), "got {:?}", err);
}

#[test]
fn in_memory_schema_is_main() {
    let schema = load_schema_str(COMMON, Path::new("common.yaml")).expect("schema should load");
    assert_eq!(schema.main_modules().count(), 1);
}
