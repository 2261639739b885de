//! Show how parsing carries on past a broken statement.
//!
//! The second line has a stray operator; the statements around it
//! still quote normally and the broken one becomes an error marker.

use elixir_syntax::{Metadata, QuoteOptions, macros, quote_str};

const SOURCE: &str = "\
total = price * quantity
discount = total * * 0.9
label = \"#{name}: #{total}\"
";

fn main() {
    let (term, errors) = quote_str(
        SOURCE,
        &QuoteOptions {
            metadata: Metadata::Line,
        },
    );
    for error in &errors {
        println!("error: {error}");
    }
    println!("{term}");
    println!();
    println!("{}", macros::to_string(&term));
}
