//! Message construction for deployment transactions.
//!
//! Pure functions. A builder never touches the network; it only turns a
//! request and a creator address into an immutable message.

use crate::error::TxError;
use crate::gen::deployer::deployment::v1 as proto;
use crate::types::{DeploymentMeta, DeploymentRequest, Payload};
use prost::{Message as ProstMessage, Name as ProstName};

/// Longest name that still fits a DNS label.
const MAX_NAME_LEN: usize = 63;

/// A deployment message ready to be encoded into a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Create { meta: DeploymentMeta, payload: Payload },
    Update { meta: DeploymentMeta, payload: Payload },
    Remove { creator: String, name: String },
}

/// A message after protobuf encoding, as it goes into a transaction body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMessage {
    pub type_url: String,
    pub value: Vec<u8>,
}

impl Message {
    /// Short operation name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Create { .. } => "create_deployment",
            Message::Update { .. } => "update_deployment",
            Message::Remove { .. } => "remove_deployment",
        }
    }

    /// Name of the deployment this message targets.
    pub fn name(&self) -> &str {
        match self {
            Message::Create { meta, .. } | Message::Update { meta, .. } => &meta.name,
            Message::Remove { name, .. } => name,
        }
    }

    /// Address that must sign this message.
    pub fn creator(&self) -> &str {
        match self {
            Message::Create { meta, .. } | Message::Update { meta, .. } => &meta.creator,
            Message::Remove { creator, .. } => creator,
        }
    }

    pub fn encode(&self) -> EncodedMessage {
        match self {
            Message::Create { meta, payload } => {
                let msg = proto::MsgCreateDeployment {
                    meta: Some(meta.into()),
                    payload: payload.to_proto(),
                };
                EncodedMessage {
                    type_url: proto::MsgCreateDeployment::type_url(),
                    value: msg.encode_to_vec(),
                }
            }
            Message::Update { meta, payload } => {
                let msg = proto::MsgUpdateDeployment {
                    meta: Some(meta.into()),
                    payload: payload.to_proto(),
                };
                EncodedMessage {
                    type_url: proto::MsgUpdateDeployment::type_url(),
                    value: msg.encode_to_vec(),
                }
            }
            Message::Remove { creator, name } => {
                let msg = proto::MsgRemoveDeployment {
                    creator: creator.clone(),
                    name: name.clone(),
                };
                EncodedMessage {
                    type_url: proto::MsgRemoveDeployment::type_url(),
                    value: msg.encode_to_vec(),
                }
            }
        }
    }
}

/// Build a create message. An attached file becomes a ZIP payload.
pub fn build_create(request: &DeploymentRequest, creator: &str) -> Result<Message, TxError> {
    let (meta, payload) = meta_and_payload(request, creator)?;
    tracing::debug!(
        name = %meta.name,
        payload_bytes = payload.len(),
        payload_digest = ?payload.digest(),
        "built create message"
    );
    Ok(Message::Create { meta, payload })
}

/// Build an update message. Without a file the payload is omitted and the
/// ledger keeps the deployment's current content.
pub fn build_update(request: &DeploymentRequest, creator: &str) -> Result<Message, TxError> {
    let (meta, payload) = meta_and_payload(request, creator)?;
    tracing::debug!(
        name = %meta.name,
        replaces_payload = !payload.is_absent(),
        "built update message"
    );
    Ok(Message::Update { meta, payload })
}

/// Build a remove message. Only emptiness is checked on the name, so records
/// written by other clients under looser naming can still be removed.
pub fn build_remove(name: &str, creator: &str) -> Result<Message, TxError> {
    require_creator(creator)?;
    if name.is_empty() {
        return Err(TxError::InvalidRequest("deployment name is empty".into()));
    }
    Ok(Message::Remove {
        creator: creator.to_string(),
        name: name.to_string(),
    })
}

fn meta_and_payload(
    request: &DeploymentRequest,
    creator: &str,
) -> Result<(DeploymentMeta, Payload), TxError> {
    require_creator(creator)?;
    validate_name(&request.name)?;

    if let Some(file) = &request.file {
        if file.content.is_empty() {
            return Err(TxError::InvalidRequest("attached archive is empty".into()));
        }
    }

    let meta = DeploymentMeta {
        name: request.name.clone(),
        description: request.description.clone(),
        domain: request.domain.clone(),
        creator: creator.to_string(),
    };
    Ok((meta, Payload::from(request.file.clone())))
}

fn require_creator(creator: &str) -> Result<(), TxError> {
    if creator.trim().is_empty() {
        return Err(TxError::MissingCreator);
    }
    Ok(())
}

/// Names end up as the first label of a hostname, so they must be one.
fn validate_name(name: &str) -> Result<(), TxError> {
    if name.is_empty() {
        return Err(TxError::InvalidRequest("deployment name is empty".into()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(TxError::InvalidRequest(format!(
            "deployment name longer than {} characters",
            MAX_NAME_LEN
        )));
    }
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid_chars || name.starts_with('-') || name.ends_with('-') {
        return Err(TxError::InvalidRequest(format!(
            "deployment name {:?} is not a valid DNS label",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ArchiveFile, ArchiveType};

    const CREATOR: &str = "cosmos1creator";

    fn request() -> DeploymentRequest {
        DeploymentRequest::new("site1")
            .with_description("my site")
            .with_domain("example.com")
    }

    #[test]
    fn test_create_preserves_meta() {
        let msg = build_create(&request(), CREATOR).unwrap();
        let Message::Create { meta, payload } = &msg else {
            panic!("expected create, got {:?}", msg);
        };
        assert_eq!(meta.name, "site1");
        assert_eq!(meta.description, "my site");
        assert_eq!(meta.domain, "example.com");
        assert_eq!(meta.creator, CREATOR);
        assert!(payload.is_absent());

        // Reading fields back from the encoded bytes gives the same values.
        let encoded = msg.encode();
        assert_eq!(encoded.type_url, "/deployer.deployment.v1.MsgCreateDeployment");
        let decoded = proto::MsgCreateDeployment::decode(encoded.value.as_slice()).unwrap();
        let wire_meta = decoded.meta.unwrap();
        assert_eq!(wire_meta.name, "site1");
        assert_eq!(wire_meta.description, "my site");
        assert_eq!(wire_meta.domain, "example.com");
        assert_eq!(wire_meta.creator, CREATOR);
        assert!(decoded.payload.is_none());
    }

    #[test]
    fn test_create_with_file_carries_zip_payload() {
        let req = request().with_file(ArchiveFile::zip(b"PK\x03\x04data".to_vec()));
        let msg = build_create(&req, CREATOR).unwrap();

        let Message::Create { payload, .. } = &msg else {
            panic!("expected create");
        };
        assert!(matches!(
            payload,
            Payload::Archive { kind: ArchiveType::Zip, content } if content.as_slice() == b"PK\x03\x04data"
        ));

        let decoded = proto::MsgCreateDeployment::decode(msg.encode().value.as_slice()).unwrap();
        let wire = decoded.payload.unwrap();
        assert_eq!(wire.archive_type, proto::ArchiveType::Zip as i32);
        assert_eq!(wire.content, b"PK\x03\x04data");
    }

    #[test]
    fn test_update_without_file_omits_payload() {
        let msg = build_update(&request().with_description("v2"), CREATOR).unwrap();
        assert_eq!(msg.kind(), "update_deployment");

        let encoded = msg.encode();
        assert_eq!(encoded.type_url, "/deployer.deployment.v1.MsgUpdateDeployment");
        let decoded = proto::MsgUpdateDeployment::decode(encoded.value.as_slice()).unwrap();
        assert_eq!(decoded.meta.unwrap().description, "v2");
        assert!(decoded.payload.is_none());
    }

    #[test]
    fn test_remove() {
        let msg = build_remove("site1", CREATOR).unwrap();
        assert_eq!(msg.name(), "site1");
        assert_eq!(msg.creator(), CREATOR);

        let encoded = msg.encode();
        assert_eq!(encoded.type_url, "/deployer.deployment.v1.MsgRemoveDeployment");
        let decoded = proto::MsgRemoveDeployment::decode(encoded.value.as_slice()).unwrap();
        assert_eq!(decoded.creator, CREATOR);
        assert_eq!(decoded.name, "site1");
    }

    #[test]
    fn test_remove_accepts_non_label_names() {
        for name in ["My_Site", "-legacy", "site.v1"] {
            assert!(build_create(&DeploymentRequest::new(name), CREATOR).is_err());
            let msg = build_remove(name, CREATOR).unwrap();
            assert_eq!(msg.name(), name);
        }
    }

    #[test]
    fn test_missing_creator() {
        assert_eq!(build_create(&request(), ""), Err(TxError::MissingCreator));
        assert_eq!(build_update(&request(), "  "), Err(TxError::MissingCreator));
        assert_eq!(build_remove("site1", ""), Err(TxError::MissingCreator));
    }

    #[test]
    fn test_invalid_names() {
        let long = "x".repeat(64);
        for name in ["", "Site", "my site", "a.b", "-lead", "trail-", long.as_str()] {
            let req = DeploymentRequest::new(name);
            assert!(
                matches!(build_create(&req, CREATOR), Err(TxError::InvalidRequest(_))),
                "name {:?} should be rejected",
                name
            );
        }
        assert!(build_create(&DeploymentRequest::new("my-site-2"), CREATOR).is_ok());
        assert!(matches!(
            build_remove("", CREATOR),
            Err(TxError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_empty_archive_rejected() {
        let req = request().with_file(ArchiveFile::zip(Vec::new()));
        assert!(matches!(
            build_create(&req, CREATOR),
            Err(TxError::InvalidRequest(_))
        ));
    }
}
