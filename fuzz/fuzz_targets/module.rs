#![no_main]

use libfuzzer_sys::fuzz_target;
use pdbcompare::{metadata::module::ModuleView, CilLoader, LoaderOptions};

fuzz_target!(|data: &[u8]| {
    if let Ok(module) = ModuleView::from_mem(data.to_vec()) {
        let loader = CilLoader::new(LoaderOptions {
            read_symbols: false,
            ..LoaderOptions::default()
        });
        let _ = loader.load_module("fuzz.dll", &module, None);
    }
});
