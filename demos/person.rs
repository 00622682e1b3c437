//! Encodes the same record with every format and decodes it back.
//!
//! Run with: cargo run --example person

use serde::{Deserialize, Serialize};
use serde_textual::{Codec, Format};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq, Default)]
struct Address {
    city: String,
    country: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Default)]
struct Person {
    name: String,
    age: u32,
    address: Address,
}

fn demonstrate<C: Codec>(codec: &C, person: &Person) -> Result<(), Box<dyn Error>> {
    println!("Encoding as {}:", codec.format_name());

    let bytes = codec.encode(person)?;
    println!("{}\n", String::from_utf8_lossy(&bytes));

    let mut decoded = Person::default();
    codec.decode(&bytes, &mut decoded)?;
    println!("Decoded: {:?}\n", decoded);

    assert_eq!(&decoded, person);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let person = Person {
        name: "Алексей".to_string(),
        age: 30,
        address: Address {
            city: "Москва".to_string(),
            country: "Россия".to_string(),
        },
    };

    for name in ["json", "toml"] {
        let format: Format = name.parse()?;
        demonstrate(&format, &person)?;
    }

    // Decoding merges into what is already there.
    let mut partial = Person {
        name: "Kept".to_string(),
        ..Person::default()
    };
    Format::Toml.decode(b"age = 41\n\n[address]\ncity = \"Berlin\"\n", &mut partial)?;
    println!("Merged: {:?}", partial);

    if let Err(err) = Format::Json.decode(b"{invalid json}", &mut partial) {
        println!("Rejected malformed input: {}", err);
    }

    Ok(())
}
