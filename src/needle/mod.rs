//! Needle Module
//!
//! A needle is one stored object: fixed metadata plus a view onto its body
//! bytes inside a volume's data file.
//!
//! ## Record Format
//!
//! Every record in a data file is a fixed 46-byte big-endian header followed
//! by the extension string and the raw body bytes:
//!
//! ```text
//! ┌────────┬─────────┬──────────┬────────┬────────────┬────────────┬─────────┬────────────┬───────┬────────┐
//! │ id (8) │ size(8) │offset (8)│ crc(4) │created_at(8)│updated_at(8)│ flag(1) │ ext_len(1) │  ext  │  body  │
//! └────────┴─────────┴──────────┴────────┴────────────┴────────────┴─────────┴────────────┴───────┴────────┘
//! ```
//!
//! The `ext_len` byte makes a record self-describing: a header+ext slice
//! decodes without consulting the directory for the extension boundary.
//! Record positions are determined solely by directory-stored offsets, not
//! by a fixed stride.

mod codec;
mod record;

pub use codec::{checksum, decode, encode, header_size, FIXED_HEADER_SIZE, MAX_EXT_LEN};
pub(crate) use codec::patch_offset;
pub use record::{Needle, NeedleFlag};
