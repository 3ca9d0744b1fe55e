#![no_main]

use formcheck_validation::{FormScope, Settings, Trigger, ValidationEngine};
use libfuzzer_sys::fuzz_target;

// Any snapshot the page can send must validate without panicking, and a
// second pass must agree with the first.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mut form) = FormScope::from_json(text) else {
        return;
    };
    let Ok(engine) = ValidationEngine::new(Settings::default()) else {
        return;
    };

    let mut trigger = Trigger::from_event_type("submit");
    if let Ok(first) = engine.run(Some(&mut trigger), &mut form) {
        let second = engine.run(None, &mut form).ok();
        assert_eq!(second.map(|o| o.errors), Some(first.errors));
    }
});
