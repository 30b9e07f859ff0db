//! Human-readable lookup tables for the protocol's reason-code fields.
//!
//! The codec itself stores raw integers (SPEC_FULL.md §4.3); these tables
//! exist only to format them for logs and error messages, the Rust analogue
//! of the reference implementation's `valuesESIDREAS`/`valuesSFNAREAS`
//! maps, expressed as plain `match` arms rather than reflection/maps of
//! `interface{}`.

/// ESID session-termination reason codes.
pub fn esid_reason_text(code: u64) -> &'static str {
    match code {
        0 => "OK",
        1 => "Unknown user code",
        2 => "Invalid password",
        3 => "Unknown user code",
        4 => "Invalid password",
        5 => "Invalid challenge response",
        6 => "Invalid filename",
        10 => "Resource limit exceeded",
        11 => "Invalid buffer size",
        12 => "Duplicate password",
        99 => "Unspecified reason",
        _ => "Unrecognized reason code",
    }
}

/// Shared by SFNA and EFNA: the SFNA/EFNA answer-reason enumeration.
pub fn file_reject_reason_text(code: u64) -> &'static str {
    match code {
        1 => "Invalid filename",
        2 => "Invalid destination",
        3 => "Invalid origin",
        4 => "Storage record format not supported",
        5 => "Maximum record length not supported",
        6 => "File size is too big",
        10 => "Invalid record count",
        11 => "Invalid byte count",
        12 => "Access method failure",
        13 => "Duplicate file",
        14 => "File direction refused",
        15 => "Cipher suite not supported",
        16 => "Encrypted file not allowed",
        17 => "Unencrypted file not allowed",
        18 => "Compression not allowed",
        19 => "Signed file not allowed",
        20 => "Unsigned file not allowed",
        21 => "Invalid file signature",
        22 => "File decryption failure",
        23 => "File decompression failure",
        99 => "Unspecified reason",
        _ => "Unrecognized reason code",
    }
}

/// NERP negative end-to-end response reason codes.
pub fn nerp_reason_text(code: u64) -> &'static str {
    match code {
        3 => "ESID received: unknown user code",
        4 => "ESID received: invalid password",
        9 => "ESID received: unspecified reason",
        11 => "SFNA(RETRY=N): invalid file name",
        12 => "SFNA(RETRY=N): invalid destination",
        13 => "SFNA(RETRY=N): invalid origin",
        14 => "SFNA(RETRY=N): invalid storage record format",
        15 => "SFNA(RETRY=N): maximum record length not supported",
        16 => "SFNA(RETRY=N): file size too big",
        20 => "SFNA(RETRY=N): invalid record count",
        21 => "SFNA(RETRY=N): invalid byte count",
        22 => "SFNA(RETRY=N): access method failure",
        23 => "SFNA(RETRY=N): duplicate file",
        24 => "SFNA(RETRY=N): file direction refused",
        25 => "SFNA(RETRY=N): cipher suite not supported",
        26 => "SFNA(RETRY=N): encrypted file not allowed",
        27 => "SFNA(RETRY=N): unencrypted file not allowed",
        28 => "SFNA(RETRY=N): compression not allowed",
        29 => "SFNA(RETRY=N): signed file not allowed",
        30 => "SFNA(RETRY=N): unsigned file not allowed",
        31 => "File signature not valid",
        _ => "Unrecognized reason code",
    }
}
