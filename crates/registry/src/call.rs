//! Typed single-call dispatch.
//!
//! A [`Call`] names one public operation with its arguments, so hosts that
//! receive calls as data (the CLI script, for one) can route them without
//! matching on strings.

use crate::Registry;
use serde::{Deserialize, Serialize};
use tessera_core::{AssetId, AssetMetadata, AssetRecord, Principal, RegistryResult};
use tessera_store::{CallContext, RegistryStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Call {
    Register {
        name: String,
        content_size: u64,
        description: String,
        tags: Vec<String>,
    },
    Update {
        asset: AssetId,
        name: String,
        content_size: u64,
        description: String,
        tags: Vec<String>,
    },
    TransferOwnership {
        asset: AssetId,
        new_owner: Principal,
    },
    Remove {
        asset: AssetId,
    },
    SetPermission {
        asset: AssetId,
        principal: Principal,
        granted: bool,
    },
    Get {
        asset: AssetId,
    },
    HasPermission {
        asset: AssetId,
        principal: Principal,
    },
}

impl Call {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::Update { .. } => "update",
            Self::TransferOwnership { .. } => "transfer_ownership",
            Self::Remove { .. } => "remove",
            Self::SetPermission { .. } => "set_permission",
            Self::Get { .. } => "get",
            Self::HasPermission { .. } => "has_permission",
        }
    }

    /// The asset this call targets, if it names one up front.
    pub fn asset(&self) -> Option<AssetId> {
        match self {
            Self::Register { .. } => None,
            Self::Update { asset, .. }
            | Self::TransferOwnership { asset, .. }
            | Self::Remove { asset }
            | Self::SetPermission { asset, .. }
            | Self::Get { asset }
            | Self::HasPermission { asset, .. } => Some(*asset),
        }
    }
}

/// What a successful call returns.
///
/// Every variant that carries data serializes as an object with its own
/// field name, so a missing record (`{"record":null}`) never looks like a
/// bare acknowledgement. `Done` carries nothing and serializes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CallOutput {
    Registered { asset: AssetId },
    Record { record: Option<AssetRecord> },
    Permission { granted: bool },
    Done,
}

impl<S: RegistryStore> Registry<S> {
    pub fn execute(&mut self, ctx: &CallContext, call: Call) -> RegistryResult<CallOutput> {
        match call {
            Call::Register {
                name,
                content_size,
                description,
                tags,
            } => {
                let metadata = AssetMetadata::new(name, content_size, description, tags);
                self.register(ctx, metadata)
                    .map(|asset| CallOutput::Registered { asset })
            }
            Call::Update {
                asset,
                name,
                content_size,
                description,
                tags,
            } => {
                let metadata = AssetMetadata::new(name, content_size, description, tags);
                self.update(ctx, asset, metadata).map(|()| CallOutput::Done)
            }
            Call::TransferOwnership { asset, new_owner } => self
                .transfer_ownership(ctx, asset, new_owner)
                .map(|()| CallOutput::Done),
            Call::Remove { asset } => self.remove(ctx, asset).map(|()| CallOutput::Done),
            Call::SetPermission {
                asset,
                principal,
                granted,
            } => self
                .set_permission(ctx, asset, principal, granted)
                .map(|()| CallOutput::Done),
            Call::Get { asset } => self.get(asset).map(|record| CallOutput::Record { record }),
            Call::HasPermission { asset, principal } => self
                .has_permission(asset, &principal)
                .map(|granted| CallOutput::Permission { granted }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::RegistryError;
    use tessera_store::MemoryStore;

    #[test]
    fn parses_tagged_json() {
        let call: Call = serde_json::from_str(
            r#"{"op":"register","name":"doc","content_size":500,"description":"x","tags":["a"]}"#,
        )
        .unwrap();
        assert_eq!(call.name(), "register");
        assert_eq!(call.asset(), None);

        let call: Call = serde_json::from_str(r#"{"op":"remove","asset":4}"#).unwrap();
        assert_eq!(call, Call::Remove { asset: AssetId::new(4) });
    }

    #[test]
    fn execute_routes_each_operation() {
        let mut reg = Registry::open(MemoryStore::new()).unwrap();
        let alice = CallContext::new(Principal::repeat_byte(1), 1);
        let bob = Principal::repeat_byte(2);

        let out = reg
            .execute(
                &alice,
                Call::Register {
                    name: "doc".into(),
                    content_size: 500,
                    description: "x".into(),
                    tags: vec!["a".into()],
                },
            )
            .unwrap();
        let asset = AssetId::new(1);
        assert_eq!(out, CallOutput::Registered { asset });

        let out = reg
            .execute(
                &alice,
                Call::SetPermission {
                    asset,
                    principal: bob,
                    granted: true,
                },
            )
            .unwrap();
        assert_eq!(out, CallOutput::Done);

        let out = reg
            .execute(&alice, Call::HasPermission { asset, principal: bob })
            .unwrap();
        assert_eq!(out, CallOutput::Permission { granted: true });

        let out = reg.execute(&alice, Call::Get { asset }).unwrap();
        assert!(matches!(
            out,
            CallOutput::Record { record: Some(ref r) } if r.asset_name == "doc"
        ));

        let err = reg
            .execute(&alice, Call::Remove { asset: AssetId::new(9) })
            .unwrap_err();
        assert_eq!(err, RegistryError::AssetNotFound(AssetId::new(9)));
    }

    #[test]
    fn outputs_serialize_with_distinct_shapes() {
        let json = serde_json::to_value(CallOutput::Registered {
            asset: AssetId::new(3),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "asset": 3 }));
        assert_eq!(
            serde_json::to_value(CallOutput::Permission { granted: false }).unwrap(),
            serde_json::json!({ "granted": false })
        );

        let missing = serde_json::to_value(CallOutput::Record { record: None }).unwrap();
        let done = serde_json::to_value(CallOutput::Done).unwrap();
        assert_eq!(missing, serde_json::json!({ "record": null }));
        assert_eq!(done, serde_json::Value::Null);
        assert_ne!(missing, done);
    }
}
