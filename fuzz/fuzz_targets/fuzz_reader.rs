#![no_main]

use libfuzzer_sys::fuzz_target;
use seqjson::{JsonTokenReader, Token, TokenReader};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(mut reader) = JsonTokenReader::new(s) {
            let mut depth = 0usize;
            while let Some(token) = reader.current() {
                match token {
                    Token::StartArray => depth += 1,
                    Token::EndArray => {
                        assert!(depth > 0, "unbalanced `]` at byte {}", reader.offset());
                        depth -= 1;
                    }
                    _ => {}
                }
                match reader.advance() {
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
        }
    }
});
