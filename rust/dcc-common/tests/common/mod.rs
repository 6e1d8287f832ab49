// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared fixture builders for `dcc-common` integration tests.

#![allow(dead_code)]

use std::io::Write as _;

use flate2::write::{DeflateEncoder, ZlibEncoder};
use flate2::Compression;
use minicbor::data::Tag;
use minicbor::Encoder;

pub(crate) fn zlib(data: &[u8]) -> Vec<u8> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

pub(crate) fn raw_deflate(data: &[u8]) -> Vec<u8> {
    let mut enc = DeflateEncoder::new(Vec::new(), Compression::best());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

/// protected = { 1: alg, 4: kid }
pub(crate) fn protected_header(alg: i64, kid: Option<&[u8]>) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut enc = Encoder::new(&mut buf);
    enc.map(if kid.is_some() { 2 } else { 1 }).unwrap();
    enc.i64(1).unwrap();
    enc.i64(alg).unwrap();
    if let Some(kid) = kid {
        enc.i64(4).unwrap();
        enc.bytes(kid).unwrap();
    }
    buf
}

/// COSE_Sign1 = [ protected, {}, payload, signature ], optionally under tag 18.
pub(crate) fn sign1(tagged: bool, protected: &[u8], payload: &[u8], signature: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out);
    if tagged {
        enc.tag(Tag::new(18)).unwrap();
    }
    enc.array(4).unwrap();
    enc.bytes(protected).unwrap();
    enc.map(0).unwrap();
    enc.bytes(payload).unwrap();
    enc.bytes(signature).unwrap();
    out
}
