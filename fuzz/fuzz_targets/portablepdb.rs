#![no_main]

use libfuzzer_sys::fuzz_target;
use pdbcompare::metadata::pdb::PortablePdb;

fuzz_target!(|data: &[u8]| {
    if let Ok(pdb) = PortablePdb::from_mem(data.to_vec()) {
        let _ = pdb.read_symbols();
    }
});
