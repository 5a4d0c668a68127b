//! Domain types for deployment transactions and queries.
//!
//! These are what the session and its collaborators pass around. Wire
//! shapes live in `gen`; conversions live next to the type they produce.

use crate::error::TxError;
use crate::gen::deployer::deployment::v1 as proto;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;

/// Metadata record of a deployment as held by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentMeta {
    pub name: String,
    pub description: String,
    pub domain: String,
    pub creator: String,
}

impl From<proto::Meta> for DeploymentMeta {
    fn from(meta: proto::Meta) -> Self {
        Self {
            name: meta.name,
            description: meta.description,
            domain: meta.domain,
            creator: meta.creator,
        }
    }
}

impl From<&DeploymentMeta> for proto::Meta {
    fn from(meta: &DeploymentMeta) -> Self {
        Self {
            creator: meta.creator.clone(),
            name: meta.name.clone(),
            description: meta.description.clone(),
            domain: meta.domain.clone(),
        }
    }
}

/// Archive formats the ledger accepts as deployment content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchiveType {
    Zip,
}

impl From<ArchiveType> for proto::ArchiveType {
    fn from(kind: ArchiveType) -> Self {
        match kind {
            ArchiveType::Zip => proto::ArchiveType::Zip,
        }
    }
}

/// Local file header of a ZIP archive.
const ZIP_MAGIC: &[u8; 4] = b"PK\x03\x04";
/// End-of-central-directory record; an empty archive starts with it.
const ZIP_EMPTY_MAGIC: &[u8; 4] = b"PK\x05\x06";

/// A user-attached archive.
#[derive(Clone, PartialEq, Eq)]
pub struct ArchiveFile {
    pub kind: ArchiveType,
    pub content: Vec<u8>,
}

impl ArchiveFile {
    pub fn zip(content: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: ArchiveType::Zip,
            content: content.into(),
        }
    }

    /// Read a ZIP archive from disk, checking its signature.
    pub async fn read_zip(path: impl AsRef<Path>) -> Result<Self, TxError> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await.map_err(|e| {
            TxError::InvalidRequest(format!("failed to read {}: {}", path.display(), e))
        })?;

        if !(content.starts_with(ZIP_MAGIC) || content.starts_with(ZIP_EMPTY_MAGIC)) {
            return Err(TxError::InvalidRequest(format!(
                "{} is not a ZIP archive",
                path.display()
            )));
        }

        Ok(Self::zip(content))
    }
}

impl fmt::Debug for ArchiveFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveFile")
            .field("kind", &self.kind)
            .field("len", &self.content.len())
            .finish()
    }
}

/// Deployment content carried by a create or update message.
///
/// `Absent` on create means the deployment has no content; on update it
/// means the current content is left as is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Payload {
    #[default]
    Absent,
    Archive { kind: ArchiveType, content: Vec<u8> },
}

impl Payload {
    pub fn is_absent(&self) -> bool {
        matches!(self, Payload::Absent)
    }

    /// Content size in bytes (0 when absent).
    pub fn len(&self) -> usize {
        match self {
            Payload::Absent => 0,
            Payload::Archive { content, .. } => content.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hex SHA-256 of the archive content, for log correlation.
    pub fn digest(&self) -> Option<String> {
        match self {
            Payload::Absent => None,
            Payload::Archive { content, .. } => Some(hex::encode(Sha256::digest(content))),
        }
    }

    pub(crate) fn to_proto(&self) -> Option<proto::Payload> {
        match self {
            Payload::Absent => None,
            Payload::Archive { kind, content } => Some(proto::Payload {
                archive_type: proto::ArchiveType::from(*kind) as i32,
                content: content.clone(),
            }),
        }
    }
}

impl From<Option<ArchiveFile>> for Payload {
    fn from(file: Option<ArchiveFile>) -> Self {
        match file {
            Some(file) => Payload::Archive {
                kind: file.kind,
                content: file.content,
            },
            None => Payload::Absent,
        }
    }
}

/// What the user filled in. Input to the message builders; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentRequest {
    pub name: String,
    pub description: String,
    pub domain: String,
    pub memo: String,
    pub file: Option<ArchiveFile>,
}

impl DeploymentRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    pub fn with_file(mut self, file: ArchiveFile) -> Self {
        self.file = Some(file);
        self
    }

    /// Attach a ZIP archive read from disk.
    pub async fn with_file_path(self, path: impl AsRef<Path>) -> Result<Self, TxError> {
        let file = ArchiveFile::read_zip(path).await?;
        Ok(self.with_file(file))
    }
}

/// Field a filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterField {
    Creator,
}

/// Comparison a filter performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
    Equal,
}

/// Query predicate: `field operator value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    pub field: FilterField,
    pub operator: FilterOperator,
    pub value: String,
}

impl Filter {
    /// Deployments created by `address`.
    pub fn creator(address: impl Into<String>) -> Self {
        Self {
            field: FilterField::Creator,
            operator: FilterOperator::Equal,
            value: address.into(),
        }
    }

    /// Evaluate the predicate against a meta record.
    pub fn matches(&self, meta: &DeploymentMeta) -> bool {
        let field = match self.field {
            FilterField::Creator => &meta.creator,
        };
        match self.operator {
            FilterOperator::Equal => *field == self.value,
        }
    }
}

impl From<&Filter> for proto::Filter {
    fn from(filter: &Filter) -> Self {
        let field = match filter.field {
            FilterField::Creator => proto::FilterField::Creator,
        };
        let operator = match filter.operator {
            FilterOperator::Equal => proto::FilterOperator::Equal,
        };
        Self {
            field: field as i32,
            operator: operator as i32,
            value: filter.value.clone(),
        }
    }
}

/// Transaction fee. Supplied by the caller; nothing here estimates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: u128,
    pub denom: String,
    pub gas_limit: u64,
}

impl Fee {
    pub fn new(amount: u128, denom: impl Into<String>, gas_limit: u64) -> Self {
        Self {
            amount,
            denom: denom.into(),
            gas_limit,
        }
    }
}

/// Transaction result from broadcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxResult {
    pub hash: String,
    pub code: u32,
    pub raw_log: String,
    pub height: u64,
}

impl TxResult {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Ledger-assigned identifier of a committed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash(pub String);

impl TxHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TxResult> for TxHash {
    fn from(result: TxResult) -> Self {
        TxHash(result.hash)
    }
}

/// Externally reachable address of a deployment:
/// `{scheme}://{name}-{address}.{domain}`.
pub fn compose_url(name: &str, address: &str, scheme: &str, domain: &str) -> String {
    format!("{}://{}-{}.{}", scheme, name, address, domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_url() {
        assert_eq!(
            compose_url("myapp", "cosmos1abc...", "https", "example.com"),
            "https://myapp-cosmos1abc....example.com"
        );
        assert_eq!(
            compose_url("site1", "akash1xyz", "http", "localhost:8080"),
            "http://site1-akash1xyz.localhost:8080"
        );
    }

    #[test]
    fn test_payload_from_file() {
        assert_eq!(Payload::from(None), Payload::Absent);

        let payload = Payload::from(Some(ArchiveFile::zip(vec![1, 2, 3])));
        assert_eq!(
            payload,
            Payload::Archive {
                kind: ArchiveType::Zip,
                content: vec![1, 2, 3]
            }
        );
        assert_eq!(payload.len(), 3);
        assert!(!payload.is_absent());
    }

    #[test]
    fn test_payload_digest() {
        assert_eq!(Payload::Absent.digest(), None);

        let payload = Payload::Archive {
            kind: ArchiveType::Zip,
            content: b"abc".to_vec(),
        };
        assert_eq!(
            payload.digest().unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_payload_to_proto() {
        assert!(Payload::Absent.to_proto().is_none());

        let wire = Payload::Archive {
            kind: ArchiveType::Zip,
            content: vec![9],
        }
        .to_proto()
        .unwrap();
        assert_eq!(wire.archive_type, proto::ArchiveType::Zip as i32);
        assert_eq!(wire.content, vec![9]);
    }

    #[test]
    fn test_filter_matches_creator() {
        let meta = DeploymentMeta {
            name: "site1".to_string(),
            description: String::new(),
            domain: String::new(),
            creator: "cosmos1owner".to_string(),
        };

        assert!(Filter::creator("cosmos1owner").matches(&meta));
        assert!(!Filter::creator("cosmos1other").matches(&meta));

        let wire = proto::Filter::from(&Filter::creator("cosmos1owner"));
        assert_eq!(wire.field, proto::FilterField::Creator as i32);
        assert_eq!(wire.operator, proto::FilterOperator::Equal as i32);
        assert_eq!(wire.value, "cosmos1owner");
    }

    #[test]
    fn test_tx_result_is_success() {
        let ok = TxResult {
            hash: "ABC123".to_string(),
            code: 0,
            raw_log: String::new(),
            height: 10,
        };
        assert!(ok.is_success());
        assert_eq!(TxHash::from(ok).as_str(), "ABC123");

        let failed = TxResult {
            hash: "DEF456".to_string(),
            code: 5,
            raw_log: "not found".to_string(),
            height: 11,
        };
        assert!(!failed.is_success());
    }

    #[test]
    fn test_serialization_golden() {
        let meta = DeploymentMeta {
            name: "site1".to_string(),
            description: "my site".to_string(),
            domain: "example.com".to_string(),
            creator: "cosmos1owner".to_string(),
        };

        let json = serde_json::to_string(&meta).unwrap();
        let expected = r#"{"name":"site1","description":"my site","domain":"example.com","creator":"cosmos1owner"}"#;
        assert_eq!(json, expected, "JSON structure changed - cached snapshot format broken");

        let filter = serde_json::to_string(&Filter::creator("cosmos1owner")).unwrap();
        assert_eq!(
            filter,
            r#"{"field":"Creator","operator":"Equal","value":"cosmos1owner"}"#
        );
    }

    #[test]
    fn test_archive_debug_hides_content() {
        let file = ArchiveFile::zip(vec![0u8; 2048]);
        let debug = format!("{:?}", file);
        assert!(debug.contains("len: 2048"));
        assert!(!debug.contains("0, 0"));
    }

    #[tokio::test]
    async fn test_read_zip_checks_signature() {
        let dir = std::env::temp_dir().join(format!("ledger-deploy-zip-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();

        let good = dir.join("site.zip");
        tokio::fs::write(&good, b"PK\x03\x04rest-of-archive").await.unwrap();
        let empty = dir.join("empty.zip");
        tokio::fs::write(&empty, b"PK\x05\x06\0\0\0\0").await.unwrap();
        let bad = dir.join("site.tar");
        tokio::fs::write(&bad, b"ustar").await.unwrap();

        let file = ArchiveFile::read_zip(&good).await.unwrap();
        assert_eq!(file.kind, ArchiveType::Zip);
        assert!(file.content.starts_with(b"PK"));

        assert!(ArchiveFile::read_zip(&empty).await.is_ok());

        let err = ArchiveFile::read_zip(&bad).await.unwrap_err();
        assert!(matches!(err, TxError::InvalidRequest(_)));

        let err = ArchiveFile::read_zip(dir.join("missing.zip")).await.unwrap_err();
        assert!(matches!(err, TxError::InvalidRequest(_)));

        let request = DeploymentRequest::new("site1")
            .with_file_path(&good)
            .await
            .unwrap();
        assert!(request.file.is_some());

        let _ = tokio::fs::remove_dir_all(dir).await;
    }
}
