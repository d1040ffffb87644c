//! Fuzz target for single ROI record decoding.
//!
//! Feeds arbitrary bytes to the decoder, checking for panics, crashes,
//! or hangs. Inputs rarely pass the signature check on their own, so each
//! input is also tried with "Io" forced into its first two bytes.

#![no_main]

use ijroi::roi::decode;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    let _ = decode(data);

    if data.len() >= 2 {
        let mut forced = data.to_vec();
        forced[0] = b'I';
        forced[1] = b'o';
        let _ = decode(&forced);
    }
});
