use clap::Parser;
use wasm_bindgen::prelude::*;

mod cookie;
mod help;
mod lesson;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(flatten)]
    lesson: lesson::LessonProps,
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let args = Args::try_parse_from(location_hash.split(['#', '&'])).expect("Could not parse args");
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).expect("Error initializing logger");
    }
    log::debug!("lesson args: {:?}", args.lesson);

    let root = document()
        .get_element_by_id("lesson")
        .expect("Could not find id=\"lesson\" element");

    log::debug!("App started");
    yew::Renderer::<lesson::LessonView>::with_root_and_props(root, args.lesson).render();
}

// browser-only tests need a document for cookies and timers
#[cfg(all(test, target_arch = "wasm32"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);
