//! Upload session bookkeeping for chunked uploads.

use std::ops::Range;

/// Provider-issued handle for one chunked upload.
///
/// Owned by a single upload and dropped once the terminal chunk is answered.
/// Ranges are produced in strictly increasing, non-overlapping order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    pub upload_url: String,
    pub total_size: u64,
    pub bytes_sent: u64,
}

impl UploadSession {
    pub fn new(upload_url: impl Into<String>, total_size: u64) -> Self {
        Self {
            upload_url: upload_url.into(),
            total_size,
            bytes_sent: 0,
        }
    }

    /// Byte range of the next chunk, or `None` when everything was sent.
    pub fn next_range(&self, chunk_size: usize) -> Option<Range<usize>> {
        if self.is_complete() {
            return None;
        }
        let start = self.bytes_sent as usize;
        let end = (start + chunk_size).min(self.total_size as usize);
        Some(start..end)
    }

    /// `Content-Range` header value, e.g. `bytes 0-327679/10485760`.
    pub fn content_range(&self, range: &Range<usize>) -> String {
        format!("bytes {}-{}/{}", range.start, range.end - 1, self.total_size)
    }

    pub fn is_final_range(&self, range: &Range<usize>) -> bool {
        range.end as u64 == self.total_size
    }

    /// Record an accepted chunk.
    pub fn advance(&mut self, range: &Range<usize>) {
        self.bytes_sent = range.end as u64;
    }

    pub fn is_complete(&self) -> bool {
        self.bytes_sent >= self.total_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::constants::UPLOAD_CHUNK_SIZE_BYTES;

    fn drain(session: &mut UploadSession, chunk_size: usize) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();
        while let Some(range) = session.next_range(chunk_size) {
            session.advance(&range);
            ranges.push(range);
        }
        ranges
    }

    #[test]
    fn ranges_are_ascending_contiguous_and_cover_payload() {
        let total = 10 * 1024 * 1024;
        let mut session = UploadSession::new("https://upload", total as u64);
        let ranges = drain(&mut session, UPLOAD_CHUNK_SIZE_BYTES);

        assert_eq!(ranges.len(), 32);
        assert_eq!(ranges.first().unwrap().start, 0);
        assert_eq!(ranges.last().unwrap().end, total);
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert!(session.is_complete());
    }

    #[test]
    fn last_chunk_may_be_short() {
        let total = UPLOAD_CHUNK_SIZE_BYTES * 2 + 10;
        let mut session = UploadSession::new("https://upload", total as u64);
        let ranges = drain(&mut session, UPLOAD_CHUNK_SIZE_BYTES);

        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[2].len(), 10);
        let probe = UploadSession::new("https://upload", total as u64);
        assert!(probe.is_final_range(&ranges[2]));
        assert!(!probe.is_final_range(&ranges[1]));
    }

    #[test]
    fn content_range_uses_inclusive_end() {
        let session = UploadSession::new("https://upload", 1000);
        assert_eq!(session.content_range(&(0..400)), "bytes 0-399/1000");
        assert_eq!(session.content_range(&(800..1000)), "bytes 800-999/1000");
    }

    #[test]
    fn empty_payload_has_no_chunks() {
        let session = UploadSession::new("https://upload", 0);
        assert!(session.next_range(UPLOAD_CHUNK_SIZE_BYTES).is_none());
        assert!(session.is_complete());
    }
}
