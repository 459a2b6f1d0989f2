#![no_main]

use libfuzzer_sys::fuzz_target;
use seqjson::{SequenceConverter, SequenceList, TypeRegistry};
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let mut registry = TypeRegistry::new();
    registry.register_element::<Value>();
    registry.register_element::<String>();
    let converter = SequenceConverter::new(registry);

    let _ = converter.from_json::<SequenceList<String>>(s);

    if let Ok(Some(list)) = converter.from_json::<SequenceList<Value>>(s) {
        let written = converter
            .to_json(Some(&list))
            .expect("a list that was read can be written");
        let reread: SequenceList<Value> = converter
            .from_json(&written)
            .expect("written output is valid")
            .expect("written output is not null");
        assert_eq!(list, reread);
    }
});
