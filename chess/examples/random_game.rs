use chessrules::board::PrettyStyle;
use chessrules::suggest::RandomSuggest;
use chessrules::{Game, Limits};

use std::env;

fn main() {
    let seed = env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);

    let mut game = Game::new();
    let mut engine = RandomSuggest::from_seed(seed);
    while !game.is_finished() && game.len() < 300 {
        let side = game.side();
        match game.play_suggested(&mut engine, Limits::default()) {
            Ok(mv) => println!("{}. {:?}: {} -> {}", game.len(), side, mv.src(), mv.dst()),
            Err(e) => {
                eprintln!("error: {}", e);
                return;
            }
        }
    }

    println!("{}", game.board().pretty(PrettyStyle::Utf8));
    println!("{}", game.fen());
    match game.outcome() {
        Some(outcome) => println!("{}", outcome),
        None => println!("no result after {} moves", game.len()),
    }
}
