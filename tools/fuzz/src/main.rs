use afl::fuzz;
use ptnib::{
    compute_iban_check_digits, compute_iban_modulus, compute_nib_check_digit, validate_iban,
    verify_check_digit, AccountParser, NIB_LENGTH,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[cfg(not(feature = "manual_test"))]
fn main() {
    fuzz!(|data: &[u8]| {
        run_raw_fuzz(&AccountParser::default(), data);
    });
}

#[cfg(feature = "manual_test")]
fn main() {
    use std::io::{stdin, Read};

    let mut input = vec![];
    stdin().read_to_end(&mut input).unwrap();
    run_raw_fuzz(&AccountParser::default(), &input);
}

fn split_bytes_once(input: &[u8]) -> Option<(&[u8], &[u8])> {
    let i = input.iter().position(|b| *b == b',')?;
    Some((&input[0..i], &input[i + 1..]))
}

fn run_raw_fuzz(parser: &AccountParser, bytes: &[u8]) -> Option<()> {
    let (input, rand_seed) = split_bytes_once(bytes)?;
    let input_str = std::str::from_utf8(input).ok()?;

    let mut rng_seed: u64 = 0;
    for byte in rand_seed.iter().take(8) {
        rng_seed <<= 8;
        rng_seed += *byte as u64;
    }

    let rng = StdRng::seed_from_u64(rng_seed);
    run_fuzz(parser, input_str, rng);

    Some(())
}

/// Sprinkles spaces and dots through `input`
fn add_separators(input: &str, rng: &mut StdRng) -> String {
    let mut output = String::with_capacity(input.len() * 2);
    for c in input.chars() {
        while rng.gen_bool(0.2) {
            output.push(if rng.gen_bool(0.5) { ' ' } else { '.' });
        }
        output.push(c);
    }
    output
}

fn run_fuzz(parser: &AccountParser, input: &str, mut rng: StdRng) {
    #[cfg(feature = "manual_test")]
    {
        println!("Input: {:?}", input);
        println!("Input len: {:?}", input.len());
    }

    let record = parser.parse(input);
    #[cfg(feature = "manual_test")]
    println!("Record: {:?}", record);

    if !record.clutter().is_empty() {
        assert!(!record.all_valid());
    }
    if record.all_valid() {
        assert_eq!(record.nib().len(), NIB_LENGTH);
        assert!(verify_check_digit(record.nib()).is_valid);
        assert!(!record.readable_nib().is_empty());
    }

    let separated = add_separators(input, &mut rng);
    assert_eq!(parser.parse(&separated), record);

    if let Ok(computed) = compute_nib_check_digit(input) {
        assert_eq!(computed.check_digits().len(), 2);
    }

    // only the residue matters here, errors are expected for most inputs
    let _ = validate_iban(input);
    if let Ok(iban) = compute_iban_check_digits(input) {
        if !iban.is_empty() {
            assert_eq!(compute_iban_modulus(&iban).map(|m| m.modulus()), Ok(1));
        }
    }
}
