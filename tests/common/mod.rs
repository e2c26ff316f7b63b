//! Builds small zip archives in memory for the integration tests.

#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use flate2::Crc;
use flate2::write::DeflateEncoder;
use std::io::Write;

pub const METHOD_STORED: u16 = 0;
pub const METHOD_DEFLATE: u16 = 8;

pub struct Member {
    pub name: String,
    pub data: Vec<u8>,
    pub method: u16,
    pub flags: u16,
    /// Overrides the computed CRC-32 when set
    pub crc32: Option<u32>,
    /// Declares this uncompressed size through a ZIP64 extra field
    pub zip64_uncompressed: Option<u64>,
}

impl Member {
    pub fn stored(name: &str, data: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            data: data.to_vec(),
            method: METHOD_STORED,
            flags: 0,
            crc32: None,
            zip64_uncompressed: None,
        }
    }

    pub fn deflated(name: &str, data: &[u8]) -> Self {
        Self {
            method: METHOD_DEFLATE,
            ..Self::stored(name, data)
        }
    }
}

#[derive(Default)]
pub struct ZipBuilder {
    members: Vec<Member>,
    comment: Vec<u8>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn comment(mut self, comment: &[u8]) -> Self {
        self.comment = comment.to_vec();
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut central = Vec::new();

        for member in &self.members {
            let mut crc = Crc::new();
            crc.update(&member.data);
            let crc32 = member.crc32.unwrap_or(crc.sum());

            let payload = match member.method {
                METHOD_DEFLATE => {
                    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
                    encoder.write_all(&member.data).unwrap();
                    encoder.finish().unwrap()
                }
                _ => member.data.clone(),
            };

            let offset = out.len() as u32;
            let name = member.name.as_bytes();

            out.write_all(b"PK\x03\x04").unwrap();
            out.write_u16::<LittleEndian>(20).unwrap();
            out.write_u16::<LittleEndian>(member.flags).unwrap();
            out.write_u16::<LittleEndian>(member.method).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.write_u16::<LittleEndian>(0x21).unwrap();
            out.write_u32::<LittleEndian>(crc32).unwrap();
            out.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
            out.write_u32::<LittleEndian>(member.data.len() as u32).unwrap();
            out.write_u16::<LittleEndian>(name.len() as u16).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.write_all(name).unwrap();
            out.write_all(&payload).unwrap();

            central.write_all(b"PK\x01\x02").unwrap();
            central.write_u16::<LittleEndian>(20).unwrap();
            central.write_u16::<LittleEndian>(20).unwrap();
            central.write_u16::<LittleEndian>(member.flags).unwrap();
            central.write_u16::<LittleEndian>(member.method).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u16::<LittleEndian>(0x21).unwrap();
            central.write_u32::<LittleEndian>(crc32).unwrap();
            central.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
            let mut extra = Vec::new();
            let declared_size = match member.zip64_uncompressed {
                Some(size) => {
                    extra.write_u16::<LittleEndian>(0x0001).unwrap();
                    extra.write_u16::<LittleEndian>(8).unwrap();
                    extra.write_u64::<LittleEndian>(size).unwrap();
                    0xFFFFFFFF
                }
                None => member.data.len() as u32,
            };
            central.write_u32::<LittleEndian>(declared_size).unwrap();
            central.write_u16::<LittleEndian>(name.len() as u16).unwrap();
            central.write_u16::<LittleEndian>(extra.len() as u16).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u32::<LittleEndian>(0).unwrap();
            central.write_u32::<LittleEndian>(offset).unwrap();
            central.write_all(name).unwrap();
            central.write_all(&extra).unwrap();
        }

        let cd_offset = out.len() as u32;
        out.write_all(&central).unwrap();

        out.write_all(b"PK\x05\x06").unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(self.members.len() as u16).unwrap();
        out.write_u16::<LittleEndian>(self.members.len() as u16).unwrap();
        out.write_u32::<LittleEndian>(central.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(cd_offset).unwrap();
        out.write_u16::<LittleEndian>(self.comment.len() as u16).unwrap();
        out.write_all(&self.comment).unwrap();

        out
    }
}

/// Three records from the documented example: A grows by 60, B shrinks by 20.
pub const SAMPLE_CSV: &str = "policyID,statecode,county,eq_site_limit,tiv_2011,tiv_2012\n\
119736,FL,A,0,100,150\n\
448094,FL,B,0,200,180\n\
206893,FL,A,0,50,60\n";

pub fn sample_archive() -> Vec<u8> {
    ZipBuilder::new()
        .member(Member::deflated("FL_insurance.csv", SAMPLE_CSV.as_bytes()))
        .build()
}
