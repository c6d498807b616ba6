//! Structural checks of declared resources against module metadata.

use hpc_modules::{is_valid_kind, ModuleInfo};

use crate::blueprint::Resource;
use crate::error::{ConfigError, ConfigResult};

/// Check that a resource has an id, a source and a recognised kind.
pub fn check_resource(res: &Resource) -> ConfigResult<()> {
    if res.id.is_empty() {
        return Err(ConfigError::EmptyId(res.dump()));
    }
    if res.source.is_empty() {
        return Err(ConfigError::EmptySource(res.dump()));
    }
    if !is_valid_kind(&res.kind) {
        return Err(ConfigError::WrongKind {
            kind: res.kind.clone(),
            dump: res.dump(),
        });
    }
    Ok(())
}

/// Check that every output the resource declares is produced by its module.
///
/// `info` is only called when the resource declares at least one output.
pub fn check_outputs<'a, F>(res: &Resource, info: F) -> ConfigResult<()>
where
    F: FnOnce() -> ConfigResult<&'a ModuleInfo>,
{
    if res.outputs.is_empty() {
        return Ok(());
    }

    let info = info()?;
    let outputs = info.outputs_as_map();
    for output in &res.outputs {
        if !outputs.contains_key(output.as_str()) {
            return Err(ConfigError::InvalidOutput {
                id: res.id.clone(),
                output: output.clone(),
            });
        }
    }
    Ok(())
}

/// Check that every setting names an input the module accepts.
///
/// Whether the module marks an input as required is not considered here.
pub fn check_settings(res: &Resource, info: &ModuleInfo) -> ConfigResult<()> {
    let inputs = info.inputs_as_map();
    for key in res.settings.keys() {
        if !inputs.contains_key(key.as_str()) {
            return Err(ConfigError::UnexpectedSetting {
                id: res.id.clone(),
                setting: key.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpc_modules::{ModuleKind, VarInfo};
    use std::cell::Cell;

    fn vpc_info() -> ModuleInfo {
        ModuleInfo::new(ModuleKind::Terraform)
            .with_input(VarInfo::new("project_id").required())
            .with_input(VarInfo::new("region").required())
            .with_input(VarInfo::new("network_name"))
            .with_output("network_name")
            .with_output("subnetwork_name")
    }

    fn vpc() -> Resource {
        Resource::new("network1", "modules/network/vpc", "terraform")
    }

    #[test]
    fn test_check_resource_ok() {
        assert!(check_resource(&vpc()).is_ok());
        assert!(check_resource(&Resource::new("img", "packer/image", "packer")).is_ok());
    }

    #[test]
    fn test_check_resource_empty_id() {
        let err = check_resource(&Resource::new("", "modules/network/vpc", "terraform")).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyId(_)));
        assert!(err.to_string().contains("source: modules/network/vpc"));
    }

    #[test]
    fn test_check_resource_empty_source() {
        let err = check_resource(&Resource::new("network1", "", "terraform")).unwrap_err();
        assert!(matches!(err, ConfigError::EmptySource(_)));
        assert!(err.to_string().contains("id: network1"));
    }

    #[test]
    fn test_check_resource_wrong_kind() {
        let res = vpc();
        let res = Resource { kind: "pulumi".to_string(), ..res };
        let err = check_resource(&res).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("wrong kind"));
        assert!(msg.contains(&res.dump()));
    }

    #[test]
    fn test_check_outputs_ok() {
        let info = vpc_info();
        let res = vpc().with_output("network_name").with_output("subnetwork_name");
        assert!(check_outputs(&res, || Ok(&info)).is_ok());
    }

    #[test]
    fn test_check_outputs_unknown_output() {
        let info = vpc_info();
        let res = vpc().with_output("network_name").with_output("nat_ip");
        let err = check_outputs(&res, || Ok(&info)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "requested output was not found in the module, module: network1 output: nat_ip"
        );
    }

    #[test]
    fn test_check_outputs_skips_metadata_without_outputs() {
        let consulted = Cell::new(false);
        let info = vpc_info();
        let res = vpc();

        check_outputs(&res, || {
            consulted.set(true);
            Ok(&info)
        })
        .unwrap();

        assert!(!consulted.get());
    }

    #[test]
    fn test_check_settings_subset_passes() {
        // region is required but absent; only unknown keys fail here
        let res = vpc()
            .with_setting("project_id", "((var.project_id))")
            .with_setting("network_name", "net");
        assert!(check_settings(&res, &vpc_info()).is_ok());
    }

    #[test]
    fn test_check_settings_unexpected_setting() {
        let res = vpc().with_setting("network_name", "net").with_setting("mtu", 1460);
        let err = check_settings(&res, &vpc_info()).unwrap_err();
        match err {
            ConfigError::UnexpectedSetting { ref id, ref setting } => {
                assert_eq!(id, "network1");
                assert_eq!(setting, "mtu");
            }
            ref other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().starts_with("unexpected setting"));
    }
}
