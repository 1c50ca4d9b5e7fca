use std::thread;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use textbook_rsa::rsa::{derive_keypair, generate_prime};
use textbook_rsa::{EncodedKeyPair, RsaConfig, RsaError, RsaKeyPair, RsaService};

fn fast_service() -> RsaService {
    RsaService::new(RsaConfig::default().with_miller_rabin_rounds(20)).unwrap()
}

fn textbook_strings() -> EncodedKeyPair {
    EncodedKeyPair {
        n: "3233".to_string(),
        e: "17".to_string(),
        d: "2753".to_string(),
    }
}

#[test]
fn generated_keys_round_trip_text() {
    let service = fast_service();
    let keys = service.generate_key_pair(512).unwrap();

    for message in ["", "Hello, RSA!", "\0", "\0\0\u{1}x", "ünïcødé ✓"] {
        let ciphertext = service.encrypt(message, &keys.e, &keys.n).unwrap();
        let decrypted = service.decrypt(&ciphertext, &keys.d, &keys.n).unwrap();
        assert_eq!(decrypted, message);
    }
}

#[test]
fn generated_keys_satisfy_invariants() {
    let mut rng = StdRng::seed_from_u64(2024);
    let p = generate_prime(192, 20, 20_000, &mut rng).unwrap();
    let q = generate_prime(192, 20, 20_000, &mut rng).unwrap();
    let keypair = derive_keypair(&p, &q, 65537, 1_000).unwrap();

    let phi = (&p - 1u8) * (&q - 1u8);
    assert!(keypair.e.gcd(&phi).is_one());
    assert!((&keypair.e * &keypair.d % &phi).is_one());
}

#[test]
fn encoded_keys_parse_back() {
    let service = fast_service();
    let keys = service.generate_key_pair(256).unwrap();
    let keypair = RsaKeyPair::try_from(&keys).unwrap();
    assert_eq!(keypair.bit_length(), 256);
    assert_eq!(keypair.to_encoded(), keys);

    let json = serde_json::to_string(&keys).unwrap();
    let parsed: EncodedKeyPair = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, keys);
}

#[test]
fn textbook_vector_through_service() {
    let service = RsaService::default();
    let keys = textbook_strings();

    let ciphertext = service.encrypt("A", &keys.e, &keys.n).unwrap();
    let frame = STANDARD.decode(&ciphertext).unwrap();
    // 'A' = 65 encrypts to 2790 = 0x0ae6
    assert_eq!(frame, vec![0, 0, 0, 1, 0x0a, 0xe6]);

    assert_eq!(service.decrypt(&ciphertext, &keys.d, &keys.n).unwrap(), "A");
}

#[test]
fn oversized_message_overflows() {
    let service = RsaService::default();
    let keys = textbook_strings();

    // "zz" is 0x7a7a, far above n = 3233
    for message in ["zz", "\u{d}\u{0}", "too long for this key"] {
        assert!(matches!(
            service.encrypt(message, &keys.e, &keys.n),
            Err(RsaError::EncodingOverflow { .. })
        ));
    }
}

#[test]
fn corrupted_ciphertext_is_classified() {
    let service = RsaService::default();
    let keys = textbook_strings();
    let ciphertext = service.encrypt("A", &keys.e, &keys.n).unwrap();
    let frame = STANDARD.decode(&ciphertext).unwrap();

    for garbage in ["", "####", "AAAA", "not base64 at all", "AAAAAQ==="] {
        assert!(matches!(
            service.decrypt(garbage, &keys.d, &keys.n),
            Err(RsaError::DecodingCorruption(_))
        ));
    }

    for byte in 0..frame.len() {
        for bit in 0..8 {
            let mut tampered = frame.clone();
            tampered[byte] ^= 1 << bit;
            match service.decrypt(&STANDARD.encode(&tampered), &keys.d, &keys.n) {
                Ok(plaintext) => assert_ne!(plaintext, "A"),
                Err(e) => assert!(matches!(e, RsaError::DecodingCorruption(_)), "{:?}", e),
            }
        }
    }
}

#[test]
fn random_bytes_never_escape_the_taxonomy() {
    let service = fast_service();
    let keys = service.generate_key_pair(256).unwrap();
    let mut rng = StdRng::seed_from_u64(77);

    for len in [0usize, 3, 35, 36, 37, 64] {
        let bytes: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        match service.decrypt(&STANDARD.encode(&bytes), &keys.d, &keys.n) {
            Ok(_) => {}
            Err(e) => assert!(matches!(e, RsaError::DecodingCorruption(_)), "{:?}", e),
        }
    }
}

#[test]
fn independent_key_pairs_differ() {
    let service = fast_service();
    let a = service.generate_key_pair(256).unwrap();
    let b = service.generate_key_pair(256).unwrap();
    assert_ne!(a.n, b.n);
}

#[test]
fn concurrent_use_of_one_service() {
    let service = fast_service();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let service = &service;
                scope.spawn(move || {
                    let keys = service.generate_key_pair(256).unwrap();
                    let message = format!("message from thread {}", i);
                    let ciphertext = service.encrypt(&message, &keys.e, &keys.n).unwrap();
                    assert_eq!(service.decrypt(&ciphertext, &keys.d, &keys.n).unwrap(), message);
                    keys.n
                })
            })
            .collect();

        let moduli: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for (i, a) in moduli.iter().enumerate() {
            for b in &moduli[i + 1..] {
                assert_ne!(a, b);
            }
        }
    });
}

#[test]
fn message_just_below_modulus() {
    let service = fast_service();
    let keys = service.generate_key_pair(256).unwrap();
    let n: BigUint = keys.n.parse().unwrap();
    let below = (&n - 1u8).to_bytes_be();

    let keypair = RsaKeyPair::try_from(&keys).unwrap();
    let ciphertext = textbook_rsa::rsa::encrypt_bytes(&below, &keypair.public_key()).unwrap();
    let decrypted =
        textbook_rsa::rsa::decrypt_bytes(&ciphertext, below.len(), &keypair.private_key()).unwrap();
    assert_eq!(decrypted, below);
}
