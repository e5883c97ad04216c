use std::fmt;

use uuid::Uuid;

use super::JobId;

const MAX_EXTENSION_LEN: usize = 8;

/// Storage key of the audio artifact belonging to a job: `<job uuid>[.ext]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactRef(String);

impl ArtifactRef {
    pub fn new(job_id: &JobId, extension: Option<&str>) -> Self {
        match extension.and_then(sanitize_extension) {
            Some(ext) => Self(format!("{}.{}", job_id.as_uuid(), ext)),
            None => Self(job_id.as_uuid().to_string()),
        }
    }

    /// Recognizes a key previously built by [`ArtifactRef::new`]. Anything
    /// else, including keys with a path separator, is `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        let (stem, extension) = match key.split_once('.') {
            Some((stem, ext)) => (stem, Some(ext)),
            None => (key, None),
        };
        let job_id = JobId::from_uuid(Uuid::parse_str(stem).ok()?);
        let artifact = Self::new(&job_id, extension);
        (artifact.as_str() == key).then_some(artifact)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn extension(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(_, ext)| ext)
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extension of an uploaded filename, e.g. `"voice.OGG"` -> `Some("OGG")`.
pub fn extension_of(filename: &str) -> Option<&str> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}

fn sanitize_extension(ext: &str) -> Option<String> {
    let ext = ext.trim_start_matches('.');
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
