//! Memory-mapped access to the DAF container underneath an SPK kernel.
//!
//! A DAF (Double-precision Array File) is a sequence of fixed 1024-byte
//! records addressed as 8-byte words. Three pieces matter here:
//!
//! 1. **File record** (record 1) — magic `DAF/SPK `, the summary geometry
//!    (ND doubles + NI integers per summary), the first summary record
//!    number, and the byte-order tag.
//! 2. **Summary records** — a linked chain of records, each holding up to
//!    25 segment summaries of 5 words: two doubles (coverage start/end in
//!    ET seconds past J2000) and six packed 32-bit integers (target,
//!    center, frame, data type, first word, last word).
//! 3. **Element data** — the Chebyshev coefficients proper, addressed by
//!    the word range in each summary.
//!
//! Only little-endian (`LTL-IEEE`) kernels are accepted; that covers every
//! DE kernel NAIF has shipped this century.

use crate::errors::{SpkError, SpkResult};
use byteorder::{ByteOrder, LittleEndian};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

const RECORD_BYTES: usize = 1024;
const WORDS_PER_RECORD: usize = 128;
const WORD_BYTES: usize = 8;

const SPK_MAGIC: &[u8; 8] = b"DAF/SPK ";
const LITTLE_ENDIAN_TAG: &[u8; 8] = b"LTL-IEEE";

/// Summary geometry of an SPK kernel: 2 doubles + 6 integers.
const SPK_ND: u32 = 2;
const SPK_NI: u32 = 6;
/// Words per summary: ND + (NI + 1) / 2.
const SUMMARY_WORDS: usize = 5;

/// One segment descriptor, as unpacked from a DAF summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentSummary {
    /// Coverage start, ET seconds past J2000.
    pub start_et: f64,
    /// Coverage end, ET seconds past J2000.
    pub end_et: f64,
    /// NAIF id of the body this segment describes.
    pub target: i32,
    /// NAIF id of the center the positions are relative to.
    pub center: i32,
    /// Reference frame id (1 = J2000 in every DE kernel).
    pub frame: i32,
    /// SPK data type (2 = Chebyshev position).
    pub data_type: i32,
    /// First word of the segment's element data (1-based).
    pub start_word: usize,
    /// Last word of the segment's element data (1-based).
    pub end_word: usize,
}

/// A validated, memory-mapped DAF file.
#[derive(Debug)]
pub struct DafFile {
    mmap: Mmap,
    first_summary_record: usize,
}

impl DafFile {
    /// Opens and validates a kernel file.
    ///
    /// # Errors
    ///
    /// Returns a [`SpkError::Format`] for wrong magic, big-endian byte
    /// order, unexpected summary geometry, or a truncated file record.
    pub fn open(path: impl AsRef<Path>) -> SpkResult<Self> {
        let file = File::open(path.as_ref())?;
        // Safety: the map is read-only and the kernel file is not expected
        // to change while the process runs.
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < RECORD_BYTES {
            return Err(SpkError::Format(format!(
                "file record truncated: {} bytes",
                mmap.len()
            )));
        }

        if &mmap[0..8] != SPK_MAGIC {
            return Err(SpkError::Format(format!(
                "bad magic {:?}, expected DAF/SPK",
                String::from_utf8_lossy(&mmap[0..8])
            )));
        }

        let nd = LittleEndian::read_u32(&mmap[8..12]);
        let ni = LittleEndian::read_u32(&mmap[12..16]);
        let fward = LittleEndian::read_u32(&mmap[76..80]) as usize;
        let format_tag = &mmap[88..96];

        if format_tag != LITTLE_ENDIAN_TAG {
            return Err(SpkError::Format(format!(
                "unsupported byte order {:?} (only LTL-IEEE kernels are read)",
                String::from_utf8_lossy(format_tag)
            )));
        }
        if nd != SPK_ND || ni != SPK_NI {
            return Err(SpkError::Format(format!(
                "unexpected summary geometry ND={nd} NI={ni}, expected ND=2 NI=6"
            )));
        }
        if fward < 2 {
            return Err(SpkError::Format(format!(
                "first summary record {fward} out of range"
            )));
        }

        Ok(Self {
            mmap,
            first_summary_record: fward,
        })
    }

    /// Byte offset of a 1-based word address.
    fn word_offset(word: usize) -> usize {
        (word - 1) * WORD_BYTES
    }

    /// Reads one double at a 1-based word address.
    fn read_word(&self, word: usize) -> SpkResult<f64> {
        let offset = Self::word_offset(word);
        let end = offset + WORD_BYTES;
        if word == 0 || end > self.mmap.len() {
            return Err(SpkError::InvalidData(format!(
                "word address {word} outside file"
            )));
        }
        Ok(LittleEndian::read_f64(&self.mmap[offset..end]))
    }

    /// Copies a contiguous run of doubles starting at a 1-based word address.
    pub fn read_words(&self, start_word: usize, count: usize) -> SpkResult<Vec<f64>> {
        let offset = Self::word_offset(start_word);
        let end = offset + count * WORD_BYTES;
        if start_word == 0 || end > self.mmap.len() {
            return Err(SpkError::InvalidData(format!(
                "word range {start_word}..+{count} outside file"
            )));
        }
        let mut out = vec![0.0; count];
        LittleEndian::read_f64_into(&self.mmap[offset..end], &mut out);
        Ok(out)
    }

    /// Walks the summary-record chain and unpacks every segment summary.
    pub fn summaries(&self) -> SpkResult<Vec<SegmentSummary>> {
        let mut out = Vec::new();
        let mut record = self.first_summary_record;
        let mut visited = 0usize;

        while record != 0 {
            visited += 1;
            if visited > 1000 {
                return Err(SpkError::InvalidData(
                    "summary record chain does not terminate".into(),
                ));
            }

            let base_word = (record - 1) * WORDS_PER_RECORD + 1;
            let next = self.read_word(base_word)? as usize;
            let count = self.read_word(base_word + 2)? as usize;
            if count > (WORDS_PER_RECORD - 3) / SUMMARY_WORDS {
                return Err(SpkError::InvalidData(format!(
                    "summary record {record} claims {count} summaries"
                )));
            }

            for i in 0..count {
                let word = base_word + 3 + i * SUMMARY_WORDS;
                out.push(self.unpack_summary(word)?);
            }

            record = next;
        }

        Ok(out)
    }

    fn unpack_summary(&self, word: usize) -> SpkResult<SegmentSummary> {
        let start_et = self.read_word(word)?;
        let end_et = self.read_word(word + 1)?;

        let int_offset = Self::word_offset(word + 2);
        let int_end = int_offset + 6 * 4;
        if int_end > self.mmap.len() {
            return Err(SpkError::InvalidData(format!(
                "summary at word {word} truncated"
            )));
        }
        let ints = &self.mmap[int_offset..int_end];

        Ok(SegmentSummary {
            start_et,
            end_et,
            target: LittleEndian::read_i32(&ints[0..4]),
            center: LittleEndian::read_i32(&ints[4..8]),
            frame: LittleEndian::read_i32(&ints[8..12]),
            data_type: LittleEndian::read_i32(&ints[12..16]),
            start_word: LittleEndian::read_i32(&ints[16..20]) as usize,
            end_word: LittleEndian::read_i32(&ints[20..24]) as usize,
        })
    }
}
