//! Editor Session
//!
//! This example walks through what an automaton editor does with the library.
//!
//! Key concepts:
//! - Placing states and wiring them with `connect`
//! - Typing rules as free-form text
//! - Testing input strings, including epsilon moves
//! - Saving, reloading and checkpointing the graph
//!
//! Run with: cargo run --example editor_session

use nfakit::checkpoint::Checkpoint;
use nfakit::{Automaton, Position, EPSILON};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Editor Session Example ===\n");

    // Binary strings ending in "01", with an epsilon hop into the final state
    let mut nfa = Automaton::new(Position::new(0, 0), false);
    let start = nfa.start();
    let zero = nfa.add_state(Position::new(120, 0), false);
    let one = nfa.add_state(Position::new(240, 0), false);
    let done = nfa.add_state(Position::new(360, 0), true);

    let t = nfa.connect(start, start)?;
    nfa.set_rules_from_text(t, "0, 1")?;
    let t = nfa.connect(start, zero)?;
    nfa.set_rules_from_text(t, "0")?;
    let t = nfa.connect(zero, one)?;
    nfa.set_rules_from_text(t, "1")?;
    let t = nfa.connect(one, done)?;
    nfa.set_rules_from_text(t, &EPSILON.to_string())?;

    // A dangling edge the user has not labeled yet
    let draft = nfa.connect(done, start)?;

    println!("States: {}, transitions: {}", nfa.state_count(), nfa.transition_count());
    for input in ["01", "1101", "10", ""] {
        println!("  run({input:?}) = {}", nfa.run(input));
    }

    if let Some(path) = nfa.accepting_path("001") {
        let route: Vec<String> = path.states().iter().map(ToString::to_string).collect();
        println!("Accepting path for \"001\": {}", route.join(" -> "));
    }

    // The user deletes the draft edge and saves
    nfa.disconnect(draft);
    let path = env::temp_dir().join("nfakit-editor-session.nfa");
    nfa.save(&path)?;
    println!("\nSaved to {}:", path.display());
    print!("{}", nfa.to_text());

    let reloaded = Automaton::load(&path)?;
    println!("\nReloaded: run(\"1101\") = {}", reloaded.run("1101"));

    // Checkpoints keep handles, so the restored graph equals the live one
    let json = Checkpoint::capture(&nfa).to_json()?;
    let restored = Checkpoint::from_json(&json)?.restore()?;
    println!("Checkpoint restored identical graph: {}", restored == nfa);

    Ok(())
}
