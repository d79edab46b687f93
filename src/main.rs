//! Soft-Lock Hunt entry point
//!
//! On the web this wires the hunt into whichever page loaded it (index or
//! puzzle page). Natively it runs the same hunt in the terminal.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlInputElement};

    use soft_lock_hunt::platform::LocalStorage;
    use soft_lock_hunt::{Access, Catalog, Hunt, HuntSettings, PuzzleDefinition};

    type SharedHunt = Rc<RefCell<Hunt<LocalStorage>>>;

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        let settings = HuntSettings::load();
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document, nothing to wire up");
            return;
        };
        let hunt = Rc::new(RefCell::new(Hunt::new(
            Catalog::builtin(),
            LocalStorage::new(),
            &settings,
        )));

        if document.get_element_by_id("puzzleList").is_some() {
            log::info!("Index page");
            render_index(&document, &hunt);
            setup_reset_button(&document, hunt);
        } else if let Some(puzzle_id) = page_puzzle_id(&document) {
            log::info!("Puzzle page {}", puzzle_id);
            setup_puzzle_page(&document, hunt, puzzle_id, &settings);
        } else {
            log::warn!("Page has neither #puzzleList nor data-puzzle-id");
        }
    }

    /// `<body data-puzzle-id="2">`
    fn page_puzzle_id(document: &Document) -> Option<u32> {
        document.body()?.dataset().get("puzzleId")?.trim().parse().ok()
    }

    /// Rebuild the puzzle list and counter from stored progress
    fn render_index(document: &Document, hunt: &SharedHunt) {
        let Some(list) = document.get_element_by_id("puzzleList") else {
            return;
        };
        let hunt = hunt.borrow();
        let state = hunt.load();

        list.set_inner_html("");
        for puzzle in hunt.visible_puzzles(&state) {
            let solved = hunt.is_solved(&state, puzzle.id);
            if let Err(e) = append_puzzle_item(document, &list, puzzle, solved) {
                log::warn!("Could not render puzzle {}: {:?}", puzzle.id, e);
            }
        }

        if let Some(counter) = document.get_element_by_id("solvedCounter") {
            counter.set_text_content(Some(&hunt.solved_summary(&state)));
        }
    }

    fn append_puzzle_item(
        document: &Document,
        list: &Element,
        puzzle: &PuzzleDefinition,
        solved: bool,
    ) -> Result<(), JsValue> {
        let li = document.create_element("li")?;
        li.set_class_name("puzzle-item");

        let left = document.create_element("div")?;
        left.set_class_name("left");

        let title = document.create_element("strong")?;
        title.set_text_content(Some(puzzle.title));

        let badge = document.create_element("span")?;
        if solved {
            badge.set_class_name("badge solved");
            badge.set_text_content(Some("Solved"));
        } else {
            badge.set_class_name("badge open");
            badge.set_text_content(Some("Unlocked"));
        }

        left.append_child(&title)?;
        left.append_child(&badge)?;

        let link = document.create_element("a")?;
        link.set_class_name("button");
        link.set_text_content(Some("Open"));
        link.set_attribute("href", puzzle.path)?;

        li.append_child(&left)?;
        li.append_child(&link)?;
        list.append_child(&li)?;
        Ok(())
    }

    fn setup_reset_button(document: &Document, hunt: SharedHunt) {
        let Some(btn) = document.get_element_by_id("resetBtn") else {
            return;
        };
        let document = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            hunt.borrow_mut().reset();
            render_index(&document, &hunt);
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message("Progress reset on this device.");
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_puzzle_page(
        document: &Document,
        hunt: SharedHunt,
        puzzle_id: u32,
        settings: &HuntSettings,
    ) {
        if hunt.borrow().require_unlocked(puzzle_id) == Access::RedirectToIndex {
            navigate(&settings.index_path);
            return;
        }

        let Some(form) = document.get_element_by_id("answerForm") else {
            log::warn!("Puzzle {} has no #answerForm", puzzle_id);
            return;
        };

        let document = document.clone();
        let settings = settings.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            event.prevent_default();

            let guess = document
                .get_element_by_id("answerInput")
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                .map(|input| input.value());
            let submission = hunt.borrow_mut().submit(puzzle_id, guess.as_deref());

            if let Some(msg) = document.get_element_by_id("answerMessage") {
                msg.set_text_content(Some(submission.message()));
                msg.set_class_name(if submission.outcome.is_correct() {
                    "message ok"
                } else {
                    "message error"
                });
            }

            let target = hunt
                .borrow()
                .after_solve_url(&settings, puzzle_id, submission.outcome);
            if let Some(target) = target {
                navigate_after(target, settings.advance_delay_ms);
            }
        });
        let _ = form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Fire-and-forget redirect; progress is already saved
    fn navigate_after(target: String, delay_ms: u32) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut()>::once(move || navigate(&target));
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay,
        ) {
            log::warn!("Could not schedule navigation: {:?}", e);
        }
        closure.forget();
    }

    fn navigate(target: &str) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(target) {
                log::warn!("Navigation to {} failed: {:?}", target, e);
            }
        }
    }
}

// Module scripts are deferred, so the DOM is parsed by the time this runs
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    web_app::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// A line typed at the native prompt
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Answer { puzzle_id: u32, guess: Option<&'a str> },
    Reset,
    Quit,
    Help,
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim();
    match line.to_lowercase().as_str() {
        "quit" | "q" | "exit" => return Command::Quit,
        "reset" => return Command::Reset,
        _ => {}
    }
    let (id, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    match id.parse() {
        Ok(puzzle_id) => Command::Answer {
            puzzle_id,
            guess: (!rest.trim().is_empty()).then_some(rest),
        },
        Err(_) => Command::Help,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn print_index(hunt: &soft_lock_hunt::Hunt<soft_lock_hunt::MemoryStorage>) {
    let state = hunt.load();
    println!();
    for puzzle in hunt.visible_puzzles(&state) {
        let badge = if hunt.is_solved(&state, puzzle.id) {
            "Solved"
        } else {
            "Unlocked"
        };
        println!("  {}. {} [{}]", puzzle.id, puzzle.title, badge);
    }
    println!("  {}", hunt.solved_summary(&state));
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::io::{BufRead, Write};

    use soft_lock_hunt::{Access, Catalog, Hunt, HuntSettings, MemoryStorage};

    env_logger::init();
    log::info!("Soft-Lock Hunt (native) starting...");
    log::info!("Progress is kept in memory only - run the web build to keep it");

    let settings = HuntSettings::load();
    let mut hunt = Hunt::new(Catalog::builtin(), MemoryStorage::new(), &settings);

    println!("Type `<puzzle id> <answer>`, `reset` or `quit`.");
    print_index(&hunt);

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                log::error!("Could not read input: {}", e);
                break;
            }
        }

        match parse_command(&line) {
            Command::Quit => break,
            Command::Help => println!("Type `<puzzle id> <answer>`, `reset` or `quit`."),
            Command::Reset => {
                hunt.reset();
                println!("Progress reset.");
                print_index(&hunt);
            }
            Command::Answer { puzzle_id, guess } => {
                if hunt.require_unlocked(puzzle_id) == Access::RedirectToIndex {
                    println!("Puzzle {} is locked.", puzzle_id);
                    continue;
                }
                let submission = hunt.submit(puzzle_id, guess);
                println!("{}", submission.message());
                if submission.outcome.is_correct() {
                    print_index(&hunt);
                }
            }
        }
    }
}
