#![no_main]

use std::collections::BTreeMap;

use libfuzzer_sys::fuzz_target;

// Wraps the input into flow sequences and mappings and decodes them through the
// typed entry points.
fuzz_target!(|data: &[u8]| {
    if data.len() > 16 * 1024 {
        return;
    }

    let s = String::from_utf8_lossy(data);

    let yaml_seq = format!("[{s}]");
    let yaml_map = format!("{{{s}}}");
    let yaml_doc = format!("root: {{{s}}}\narray: [{s}]\n");

    let _ = yaml_visit::from_str::<Vec<String>>(&yaml_seq);
    let _ = yaml_visit::from_str::<Vec<i64>>(&yaml_seq);
    let _ = yaml_visit::from_str::<BTreeMap<String, String>>(&yaml_map);
    let _ = yaml_visit::from_str::<BTreeMap<String, BTreeMap<String, bool>>>(&yaml_doc);
});
