use crate::error::GenError;
use crate::idl::resolved::c_scoped_name;
use idl_types::{Module, ScopedName};
use serde_derive::{Deserialize, Serialize};
use std::path::Path;

/// Knobs of the C back end. Every field has a default, so a configuration
/// file only needs to name what it changes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct GeneratorOptions {
    /// Spaces per indentation level in emitted C.
    pub indent: usize,
    /// Headers included with quotes, ahead of the system headers.
    pub local_includes: Vec<String>,
    /// Headers included with angle brackets.
    pub system_includes: Vec<String>,
    /// Status type returned by handlers; unqualified names are scoped into the module.
    pub error_type: String,
    /// Returned by handlers of operations declared `void`.
    pub success_status: String,
    pub invalid_service_code: String,
    pub invalid_attribute_code: String,
    /// Blocking request/response transport called by stubs.
    pub transport_fn: String,
    /// Stubs take the target instance number as their first argument.
    pub stub_instance_argument: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            local_includes: vec!["message-buffer.h".to_string()],
            system_includes: vec![
                "stdint.h".to_string(),
                "stdbool.h".to_string(),
                "stddef.h".to_string(),
            ],
            error_type: "ErrorCode".to_string(),
            success_status: "e_EC_SUCCESS".to_string(),
            invalid_service_code: "e_EC_INVALID_SERVICE_CODE".to_string(),
            invalid_attribute_code: "e_EC_INVALID_ATTRIBUTE_CODE".to_string(),
            transport_fn: "SendMessage".to_string(),
            stub_instance_argument: false,
        }
    }
}

impl GeneratorOptions {
    pub fn from_yaml(contents: &str, origin: &Path) -> Result<Self, GenError> {
        serde_yml::from_str(contents).map_err(|source| GenError::Config {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, GenError> {
        let contents = std::fs::read_to_string(path).map_err(|source| GenError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents, path)
    }

    /// C name of the status type for `module`, e.g. `Demo_ErrorCode`.
    pub fn error_type_name(&self, module: &Module) -> String {
        let scoped = if ScopedName::is_qualified(&self.error_type) {
            ScopedName::parse(&self.error_type)
        } else {
            ScopedName::root().child(&module.name).child(&self.error_type)
        };
        c_scoped_name(&scoped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str) -> Module {
        Module {
            name: name.to_string(),
            definitions: Vec::new(),
            interfaces: Vec::new(),
        }
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let yaml = "indent: 4\nstub-instance-argument: true\n";
        let options = GeneratorOptions::from_yaml(yaml, Path::new("c.yaml")).unwrap();
        assert_eq!(options.indent, 4);
        assert!(options.stub_instance_argument);
        assert_eq!(options.transport_fn, "SendMessage");
        assert_eq!(options.local_includes, vec!["message-buffer.h".to_string()]);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = GeneratorOptions::from_yaml("indentation: 4\n", Path::new("c.yaml")).unwrap_err();
        assert!(matches!(err, GenError::Config { .. }), "got {:?}", err);
    }

    #[test]
    fn error_type_is_scoped_into_module() {
        let options = GeneratorOptions::default();
        assert_eq!(options.error_type_name(&module("Demo")), "Demo_ErrorCode");

        let qualified = GeneratorOptions {
            error_type: "Common::Status".to_string(),
            ..GeneratorOptions::default()
        };
        assert_eq!(qualified.error_type_name(&module("Demo")), "Common_Status");
    }
}
