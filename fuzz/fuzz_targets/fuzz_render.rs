// SPDX-License-Identifier: AGPL-3.0-or-later
#![no_main]

use libfuzzer_sys::fuzz_target;
use richtext_core::{render, RenderResult};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    match render(input) {
        RenderResult::Fallback(raw) => assert_eq!(raw, input),
        RenderResult::Rendered(fragments) => {
            assert_eq!(render(input), RenderResult::Rendered(fragments));
        }
    }
});
