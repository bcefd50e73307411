use crate::agents::PackageInfo;
use crate::error::{NuvcError, Result};
use serde::{Deserialize, Serialize};

/// Messages the panel sends to the host, one JSON object per line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(
    tag = "command",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum PanelCommand {
    Search {
        text: String,
    },
    UpdatePackageVersions {
        package_name: String,
        target_version: String,
    },
    OpenBulkUpdate {
        packages: Vec<PackageSelection>,
        #[serde(default)]
        suggested_version: Option<String>,
    },
    RefreshPackageList,
    BulkUpdate {
        target_version: String,
    },
    RefreshVersions,
    Cancel,
}

/// A package picked for bulk update. Extra fields sent by the panel are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageSelection {
    pub name: String,
}

impl PanelCommand {
    pub fn decode(line: &str) -> Result<Self> {
        serde_json::from_str(line).map_err(|e| NuvcError::Protocol(e.to_string()))
    }
}

/// Messages the host sends back to the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum PanelNotification {
    UpdateResults { packages: Vec<PackageInfo> },
    RefreshPackages { packages: Vec<PackageInfo> },
    UpdateVersions { versions: Vec<String> },
    ShowInformation { message: String },
    ShowWarning { message: String },
    ShowError { message: String },
}

impl PanelNotification {
    pub fn information(message: impl Into<String>) -> Self {
        Self::ShowInformation {
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::ShowWarning {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::ShowError {
            message: message.into(),
        }
    }

    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::PackageConsumer;
    use serde_json::{Value, json};

    #[test]
    fn decodes_every_command() {
        assert_eq!(
            PanelCommand::decode(r#"{"command":"search","text":"json"}"#).unwrap(),
            PanelCommand::Search {
                text: "json".into()
            }
        );
        assert_eq!(
            PanelCommand::decode(
                r#"{"command":"updatePackageVersions","packageName":"Serilog","targetVersion":"3.1.1"}"#
            )
            .unwrap(),
            PanelCommand::UpdatePackageVersions {
                package_name: "Serilog".into(),
                target_version: "3.1.1".into(),
            }
        );
        assert_eq!(
            PanelCommand::decode(
                r#"{"command":"openBulkUpdate","packages":[{"name":"Polly","versions":[]}],"suggestedVersion":"8.0.0"}"#
            )
            .unwrap(),
            PanelCommand::OpenBulkUpdate {
                packages: vec![PackageSelection {
                    name: "Polly".into()
                }],
                suggested_version: Some("8.0.0".into()),
            }
        );
        assert_eq!(
            PanelCommand::decode(r#"{"command":"bulkUpdate","targetVersion":"9.0.0"}"#).unwrap(),
            PanelCommand::BulkUpdate {
                target_version: "9.0.0".into()
            }
        );
        assert_eq!(
            PanelCommand::decode(r#"{"command":"refreshPackageList"}"#).unwrap(),
            PanelCommand::RefreshPackageList
        );
        assert_eq!(
            PanelCommand::decode(r#"{"command":"refreshVersions"}"#).unwrap(),
            PanelCommand::RefreshVersions
        );
        assert_eq!(
            PanelCommand::decode(r#"{"command":"cancel"}"#).unwrap(),
            PanelCommand::Cancel
        );
    }

    #[test]
    fn unknown_or_malformed_commands_are_protocol_errors() {
        for line in [
            r#"{"command":"confirm"}"#,
            r#"{"command":"search"}"#,
            r#"{"text":"json"}"#,
            "not json",
        ] {
            assert!(
                matches!(PanelCommand::decode(line), Err(NuvcError::Protocol(_))),
                "{line}"
            );
        }
    }

    #[test]
    fn notifications_use_panel_field_names() {
        let packages = vec![PackageInfo {
            name: "Serilog".into(),
            consumers: vec![PackageConsumer {
                source_file: "Api.csproj".into(),
                version: "3.1.1".into(),
            }],
        }];
        let encoded = PanelNotification::RefreshPackages { packages }
            .encode()
            .unwrap();
        let value: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(
            value,
            json!({
                "command": "refreshPackages",
                "packages": [{
                    "name": "Serilog",
                    "consumers": [{ "sourceFile": "Api.csproj", "version": "3.1.1" }]
                }]
            })
        );

        let value: Value =
            serde_json::from_str(&PanelNotification::warning("No workspace").encode().unwrap())
                .unwrap();
        assert_eq!(
            value,
            json!({ "command": "showWarning", "message": "No workspace" })
        );
    }
}
