//! demos - a minimal text-adapter loop driving cultivation_core's command
//! dispatcher end to end, standing in for the chat-platform adapter the
//! simulation core treats as an external collaborator.
//!
//! Run it and type commands exactly as the command surface names them,
//! e.g. `enter_cultivation spirit`, `start_cultivation`, `info`.

use std::io::{self, BufRead, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use cultivation_core::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn main() -> io::Result<()> {
    let mut dispatcher = Dispatcher::with_defaults();
    let mut rng = ChaCha8Rng::seed_from_u64(now_unix() as u64);

    let user_id = "demo_player";
    let display_name = "Demo Player";

    println!("== cultivation simulation demo ==");
    println!("type a command, or `help` for a few examples, `quit` to exit.\n");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }
        if line == "help" {
            print_help();
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else { continue };
        let args: Vec<&str> = tokens.collect();
        let now = now_unix();

        match dispatcher.dispatch(user_id, display_name, command, &args, now, &mut rng) {
            Ok(response) => println!("{response}"),
            Err(err) => println!("error: {err}"),
        }
    }

    println!("farewell, cultivator.");
    Ok(())
}

fn print_help() {
    println!(
        "try, in order:\n\
         \x20 enter_cultivation spirit\n\
         \x20 info\n\
         \x20 start_cultivation\n\
         \x20 end_cultivation\n\
         \x20 combat_stats\n\
         \x20 skill_list\n\
         \x20 learn_skill flowing_blade\n\
         \x20 equip_skill flowing_blade\n\
         \x20 breakthrough_info\n\
         \x20 storage_ring"
    );
}
