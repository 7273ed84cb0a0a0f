//! A core wire-format codec for Protocol Buffers.
//!
//! Four decoder variants ([`reader::slice`], [`reader::chunks`],
//! [`reader::stream`], [`reader::direct`]) and five encoder variants
//! ([`writer::array`], [`writer::heap`], [`writer::direct`],
//! [`writer::stream`], [`writer::byte_output`]) share their varint, fixed-
//! width, and length-delimited logic through the [`reader::CodedInput`] and
//! [`writer::CodedOutput`] traits. Generated message types are out of
//! scope: this crate is the layer those would be built on top of.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod bytes;
pub mod config;
pub mod errors;
pub mod message;
pub mod reader;
pub mod utf8;
pub mod varint;
pub mod wire_format;
pub mod writer;

pub use crate::{
    bytes::Bytes,
    config::{DecoderConfig, EncoderConfig},
    errors::{Error, Result},
    message::{MessageInfo, MessageRead, MessageWrite},
    reader::CodedInput,
    writer::CodedOutput,
};
