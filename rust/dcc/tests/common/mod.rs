// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builders for complete HC1 certificates signed with a fixed P-256 key.

#![allow(dead_code)]

use std::io::Write as _;

use dcc_common::base45;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use minicbor::data::Tag;
use minicbor::Encoder;
use p256::pkcs8::EncodePublicKey as _;
use signature::Signer as _;

/// German test-issuer kid, base64 `DEsVUSvpFAE=`.
pub(crate) const REFERENCE_KID: &[u8] = &[0x0c, 0x4b, 0x15, 0x51, 0x2b, 0xe9, 0x14, 0x01];

pub(crate) const REFERENCE_DCC: &str = "HC1:6BFOXN*TS0BI$ZD-PHQ7I9AD66V5B22CH9M9ESI9XBHXK-%69LQOGI.*V76GCV4*XUA2P-FHT-HNTI4L6N$Q%UG/YL WO*Z7ON15 BM0VM.JQ$F4W17PG4.VAS5EG4V*BRL0K-RDY5RWOOH6PO9:TUQJAJG9-*NIRICVELZUZM9EN9-O9:PICIG805CZKHKB-43.E3KD3OAJ6*K6ZCY73JC3KD3ZQTWD3E.KLC8M3LP-89B9K+KB2KK3M*EDZI9$JAQJKKIJX2MM+GWHKSKE MCAOI8%MCU5VTQDPIMQK9*O7%NC.UTWA6QK.-T3-SY$NCU5CIQ 52744E09TBOC.UKMI$8R+1A7CPFRMLNKNM8JI0JPGN:0K7OOBRLY667SYHJL9B7VPO:SWLH1/S4KQQK0$5REQT5RN1FR%SHPLRKWJO8LQ84EBC$-P4A0V1BBR5XWB3OCGEK:$8HHOLQOZUJ*30Q8CD1";

pub(crate) const TEST_KID: &[u8] = b"test-kid";

pub(crate) fn signing_key() -> p256::ecdsa::SigningKey {
    p256::ecdsa::SigningKey::from_slice(&[0x42; 32]).unwrap()
}

pub(crate) fn spki(key: &p256::ecdsa::SigningKey) -> Vec<u8> {
    key.verifying_key().to_public_key_der().unwrap().as_bytes().to_vec()
}

/// A vaccination certificate issued by "AT".
pub(crate) fn vaccination_claims() -> Vec<u8> {
    let mut buf = Vec::new();
    let mut enc = Encoder::new(&mut buf);
    enc.map(4).unwrap();
    enc.i64(1).unwrap().str("AT").unwrap();
    enc.i64(4).unwrap().i64(1_700_000_000).unwrap();
    enc.i64(6).unwrap().i64(1_650_000_000).unwrap();
    enc.i64(-260).unwrap().map(1).unwrap();
    enc.i64(1).unwrap().map(4).unwrap();
    enc.str("ver").unwrap().str("1.3.0").unwrap();
    enc.str("nam").unwrap().map(2).unwrap();
    enc.str("fn").unwrap().str("Musterfrau").unwrap();
    enc.str("gn").unwrap().str("Gabriele").unwrap();
    enc.str("dob").unwrap().str("1998-02-26").unwrap();
    enc.str("v").unwrap().array(1).unwrap().map(4).unwrap();
    enc.str("tg").unwrap().str("840539006").unwrap();
    enc.str("dn").unwrap().u8(2).unwrap();
    enc.str("co").unwrap().str("AT").unwrap();
    enc.str("ci").unwrap().str("URN:UVCI:01:AT:TEST#0").unwrap();
    buf
}

pub(crate) fn protected(alg: i64, kid: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut enc = Encoder::new(&mut buf);
    enc.map(2).unwrap();
    enc.i64(1).unwrap().i64(alg).unwrap();
    enc.i64(4).unwrap().bytes(kid).unwrap();
    buf
}

pub(crate) struct Signed {
    pub protected: Vec<u8>,
    pub payload: Vec<u8>,
    pub signature: Vec<u8>,
}

impl Signed {
    pub(crate) fn envelope(&self, tagged: bool) -> Vec<u8> {
        let mut out = Vec::new();
        let mut enc = Encoder::new(&mut out);
        if tagged {
            enc.tag(Tag::new(18)).unwrap();
        }
        enc.array(4).unwrap();
        enc.bytes(&self.protected).unwrap();
        enc.map(0).unwrap();
        enc.bytes(&self.payload).unwrap();
        enc.bytes(&self.signature).unwrap();
        out
    }

    pub(crate) fn certificate(&self, tagged: bool) -> String {
        certificate(&self.envelope(tagged))
    }
}

/// ES256-sign `payload` under a protected header carrying `kid`.
pub(crate) fn sign(key: &p256::ecdsa::SigningKey, kid: &[u8], payload: Vec<u8>) -> Signed {
    let protected = protected(-7, kid);

    let mut tbs = Vec::new();
    let mut enc = Encoder::new(&mut tbs);
    enc.array(4).unwrap();
    enc.str("Signature1").unwrap();
    enc.bytes(&protected).unwrap();
    enc.bytes(&[]).unwrap();
    enc.bytes(&payload).unwrap();

    let sig: p256::ecdsa::Signature = key.sign(&tbs);
    Signed {
        protected,
        payload,
        signature: sig.to_bytes().to_vec(),
    }
}

pub(crate) fn zlib(data: &[u8]) -> Vec<u8> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

/// `HC1:` + Base45(zlib(cbor)).
pub(crate) fn certificate(cbor: &[u8]) -> String {
    format!("HC1:{}", base45::encode(&zlib(cbor)))
}
