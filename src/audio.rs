use std::io::{Cursor, Read, Seek, SeekFrom};

/// Maps a declared MIME type to `(file_extension, mime_hint)` for the
/// transcription upload. Unknown types fall back to the `webm` extension and
/// keep the caller's MIME string untouched.
pub fn detect_audio_format(mime_type: &str) -> (&'static str, String) {
    let lowered = mime_type.to_lowercase();

    if lowered.contains("wav") {
        return ("wav", "audio/wav".to_string());
    }
    if lowered.contains("ogg") {
        return ("ogg", "audio/ogg".to_string());
    }
    if lowered.contains("mpeg") || lowered.contains("mp3") {
        return ("mp3", "audio/mpeg".to_string());
    }
    if lowered.contains("webm") {
        return ("webm", "audio/webm".to_string());
    }

    ("webm", mime_type.to_string())
}

/// An in-memory audio upload with the file name the provider uses to sniff
/// the container format.
#[derive(Debug, Clone)]
pub struct AudioFile {
    pub file_name: String,
    pub mime_type: String,
    cursor: Cursor<Vec<u8>>,
}

impl AudioFile {
    pub fn from_bytes(data: Vec<u8>, file_name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        let mut cursor = Cursor::new(data);
        cursor.set_position(0);
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            cursor,
        }
    }

    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.get_ref().is_empty()
    }

    /// Rewinds and reads the whole payload.
    pub fn read_all(&mut self) -> std::io::Result<Vec<u8>> {
        self.cursor.seek(SeekFrom::Start(0))?;
        let mut buf = Vec::with_capacity(self.len());
        self.cursor.read_to_end(&mut buf)?;
        Ok(buf)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.cursor.into_inner()
    }
}
