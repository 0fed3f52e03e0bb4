//! End-to-end integration tests for SLIP-39 backups.
//!
//! These tests drive the public API the way a wallet does: split a master
//! secret into mnemonics, hand a subset back, recover. Between them they cover
//! every failure a user can provoke by typing the wrong thing: too few shares,
//! shares from another backup, the same share twice, a typo that breaks the
//! checksum, the wrong passphrase.

use rand::rngs::OsRng;
use rand::seq::SliceRandom;

use slip39::cipher;
use slip39::{
    check_single_share, generate_mnemonics, recover_master_secret, ErrorKind, GroupSpec,
    RecoverySession, Share, Slip39Error,
};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// The 16-byte secret `00 01 .. 0f`.
fn counting_secret() -> Vec<u8> {
    (0u8..16).collect()
}

fn groups(specs: &[(u8, u8)]) -> Vec<GroupSpec> {
    specs
        .iter()
        .map(|&(t, n)| GroupSpec::new(t, n).unwrap())
        .collect()
}

/// All `k`-element subsets of `0..n`, as index vectors.
fn subsets(n: usize, k: usize) -> Vec<Vec<usize>> {
    fn walk(start: usize, n: usize, k: usize, cur: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if cur.len() == k {
            out.push(cur.clone());
            return;
        }
        for i in start..n {
            cur.push(i);
            walk(i + 1, n, k, cur, out);
            cur.pop();
        }
    }
    let mut out = Vec::new();
    walk(0, n, k, &mut Vec::new(), &mut out);
    out
}

/// Replace word `position` of `mnemonic` with a different word.
fn swap_word(mnemonic: &str, position: usize) -> String {
    let mut words: Vec<&str> = mnemonic.split(' ').collect();
    words[position] = if words[position] == "academic" { "acid" } else { "academic" };
    words.join(" ")
}

// ---------------------------------------------------------------------------
// 1. Single Group Threshold
// ---------------------------------------------------------------------------

#[test]
fn any_three_of_five_recover() {
    let secret = counting_secret();
    let mnemonics =
        generate_mnemonics(&mut OsRng, &secret, 0, None, b"", 1, &groups(&[(3, 5)])).unwrap();
    let members = &mnemonics[0];
    assert_eq!(members.len(), 5);

    for subset in subsets(5, 3) {
        let chosen: Vec<&str> = subset.iter().map(|&i| members[i].as_str()).collect();
        let recovered = recover_master_secret(&chosen, b"").unwrap();
        assert_eq!(*recovered, secret, "subset {subset:?}");
    }
}

#[test]
fn two_of_five_is_not_enough() {
    let secret = counting_secret();
    let mnemonics =
        generate_mnemonics(&mut OsRng, &secret, 0, None, b"", 1, &groups(&[(3, 5)])).unwrap();

    for subset in subsets(5, 2) {
        let chosen: Vec<&str> = subset.iter().map(|&i| mnemonics[0][i].as_str()).collect();
        let err = recover_master_secret(&chosen, b"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientShares);
        assert_eq!(
            err,
            Slip39Error::NotEnoughMemberShards { group: 0, threshold: 3, got: 2 }
        );
    }
}

#[test]
fn more_than_threshold_is_fine() {
    let secret = counting_secret();
    let mnemonics =
        generate_mnemonics(&mut OsRng, &secret, 0, None, b"", 1, &groups(&[(3, 5)])).unwrap();
    assert_eq!(*recover_master_secret(&mnemonics[0], b"").unwrap(), secret);
}

// ---------------------------------------------------------------------------
// 2. Multiple Groups
// ---------------------------------------------------------------------------

#[test]
fn two_of_three_groups_in_any_order() {
    let secret: Vec<u8> = (100u8..132).collect();
    let mnemonics = generate_mnemonics(
        &mut OsRng,
        &secret,
        1,
        Some(4321),
        b"TREZOR",
        2,
        &groups(&[(1, 1), (2, 3), (3, 5)]),
    )
    .unwrap();

    let mut chosen = vec![
        mnemonics[0][0].clone(),
        mnemonics[2][4].clone(),
        mnemonics[2][0].clone(),
        mnemonics[2][2].clone(),
    ];
    for _ in 0..4 {
        chosen.shuffle(&mut OsRng);
        assert_eq!(*recover_master_secret(&chosen, b"TREZOR").unwrap(), secret);
    }

    let from_one_and_two = [&mnemonics[1][2], &mnemonics[1][0], &mnemonics[0][0]];
    assert_eq!(
        *recover_master_secret(&from_one_and_two, b"TREZOR").unwrap(),
        secret
    );
}

#[test]
fn a_single_group_is_not_enough() {
    let mnemonics = generate_mnemonics(
        &mut OsRng,
        &counting_secret(),
        0,
        None,
        b"",
        2,
        &groups(&[(2, 2), (2, 2)]),
    )
    .unwrap();
    assert_eq!(
        recover_master_secret(&mnemonics[1], b""),
        Err(Slip39Error::InsufficientShares { required: 2, got: 1 })
    );
}

#[test]
fn incomplete_extra_group_is_ignored() {
    let secret = counting_secret();
    let mnemonics = generate_mnemonics(
        &mut OsRng,
        &secret,
        0,
        None,
        b"",
        2,
        &groups(&[(2, 3), (2, 3), (2, 3)]),
    )
    .unwrap();
    let chosen = [
        &mnemonics[0][0],
        &mnemonics[0][1],
        &mnemonics[1][2],
        &mnemonics[2][1],
        &mnemonics[2][2],
    ];
    assert_eq!(*recover_master_secret(&chosen, b"").unwrap(), secret);
}

// ---------------------------------------------------------------------------
// 3. Mismatched Inputs
// ---------------------------------------------------------------------------

#[test]
fn shares_from_different_backups_are_rejected() {
    let secret = counting_secret();
    let spec = groups(&[(2, 3)]);
    let a = generate_mnemonics(&mut OsRng, &secret, 0, Some(1), b"", 1, &spec).unwrap();
    let b = generate_mnemonics(&mut OsRng, &secret, 0, Some(2), b"", 1, &spec).unwrap();

    let err = recover_master_secret(&[&a[0][0], &b[0][1]], b"").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Consistency);
}

#[test]
fn mismatched_iteration_exponent_is_rejected() {
    let secret = counting_secret();
    let spec = groups(&[(2, 3)]);
    let a = generate_mnemonics(&mut OsRng, &secret, 0, Some(9), b"", 1, &spec).unwrap();
    let b = generate_mnemonics(&mut OsRng, &secret, 1, Some(9), b"", 1, &spec).unwrap();

    let err = recover_master_secret(&[&a[0][0], &b[0][1]], b"").unwrap_err();
    assert!(matches!(err, Slip39Error::Inconsistent(ref msg) if msg.contains("iteration")));
}

#[test]
fn mismatched_group_parameters_are_rejected() {
    let secret = counting_secret();
    let one = generate_mnemonics(&mut OsRng, &secret, 0, Some(5), b"", 1, &groups(&[(2, 3)]))
        .unwrap();
    let two_groups = groups(&[(2, 3), (2, 3)]);
    let count = generate_mnemonics(&mut OsRng, &secret, 0, Some(5), b"", 1, &two_groups).unwrap();
    let threshold =
        generate_mnemonics(&mut OsRng, &secret, 0, Some(5), b"", 2, &two_groups).unwrap();

    let err = recover_master_secret(&[&one[0][0], &count[0][1]], b"").unwrap_err();
    assert!(matches!(err, Slip39Error::Inconsistent(ref msg) if msg.contains("1-of-2")));
    assert_eq!(err.kind(), ErrorKind::Consistency);

    let err = recover_master_secret(&[&count[0][0], &threshold[1][1]], b"").unwrap_err();
    assert!(matches!(err, Slip39Error::Inconsistent(ref msg) if msg.contains("2-of-2")));
    assert_eq!(err.kind(), ErrorKind::Consistency);
}

#[test]
fn mismatched_share_length_is_rejected() {
    let spec = groups(&[(2, 3)]);
    let short = generate_mnemonics(&mut OsRng, &[1u8; 16], 0, Some(6), b"", 1, &spec).unwrap();
    let long = generate_mnemonics(&mut OsRng, &[1u8; 32], 0, Some(6), b"", 1, &spec).unwrap();

    let err = recover_master_secret(&[&short[0][0], &long[0][1]], b"").unwrap_err();
    assert_eq!(
        err,
        Slip39Error::Inconsistent("share length 32 does not match 16".into())
    );
    assert_eq!(err.kind(), ErrorKind::Consistency);
}

#[test]
fn mismatched_member_threshold_is_rejected() {
    let secret = counting_secret();
    let a = generate_mnemonics(&mut OsRng, &secret, 0, Some(8), b"", 1, &groups(&[(2, 3)]))
        .unwrap();
    let b = generate_mnemonics(&mut OsRng, &secret, 0, Some(8), b"", 1, &groups(&[(3, 3)]))
        .unwrap();

    let err = recover_master_secret(&[&a[0][0], &b[0][1]], b"").unwrap_err();
    assert_eq!(
        err,
        Slip39Error::Inconsistent("member threshold 3 of group 0 does not match 2".into())
    );
    assert_eq!(err.kind(), ErrorKind::Consistency);

    let mut session = RecoverySession::new();
    session.add_mnemonic(&b[0][0]).unwrap();
    let err = session.check_mnemonic(&a[0][1]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Consistency);
    assert_eq!(session.progress().groups[0].members_present, 1);
}

#[test]
fn duplicate_member_is_rejected() {
    let mnemonics = generate_mnemonics(
        &mut OsRng,
        &counting_secret(),
        0,
        None,
        b"",
        1,
        &groups(&[(3, 5)]),
    )
    .unwrap();
    let chosen = [&mnemonics[0][1], &mnemonics[0][3], &mnemonics[0][1]];
    let err = recover_master_secret(&chosen, b"").unwrap_err();
    assert_eq!(err, Slip39Error::DuplicateMemberIndex(1));
    assert_eq!(err.kind(), ErrorKind::Consistency);
}

#[test]
fn shares_from_two_splits_of_one_backup_fail_the_digest() {
    let secret = counting_secret();
    let spec = groups(&[(2, 3)]);
    let a = generate_mnemonics(&mut OsRng, &secret, 0, Some(77), b"", 1, &spec).unwrap();
    let b = generate_mnemonics(&mut OsRng, &secret, 0, Some(77), b"", 1, &spec).unwrap();

    assert_eq!(
        recover_master_secret(&[&a[0][0], &b[0][1]], b""),
        Err(Slip39Error::DigestMismatch)
    );
}

// ---------------------------------------------------------------------------
// 4. Transcription Errors
// ---------------------------------------------------------------------------

#[test]
fn corrupted_word_breaks_checksum() {
    let mnemonics = generate_mnemonics(
        &mut OsRng,
        &counting_secret(),
        0,
        None,
        b"",
        1,
        &groups(&[(2, 3)]),
    )
    .unwrap();
    for position in [0, 5, 12, 19] {
        let corrupted = swap_word(&mnemonics[0][0], position);
        assert_eq!(
            check_single_share(&corrupted),
            Err(Slip39Error::InvalidMnemonicChecksum)
        );
        let pair = [corrupted.as_str(), mnemonics[0][1].as_str()];
        let err = recover_master_secret(&pair, b"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Checksum);
    }
}

#[test]
fn all_mnemonics_are_decoded_before_comparison() {
    let spec = groups(&[(2, 3)]);
    let a = generate_mnemonics(&mut OsRng, &counting_secret(), 0, Some(5), b"", 1, &spec).unwrap();
    let b = generate_mnemonics(&mut OsRng, &counting_secret(), 0, Some(6), b"", 1, &spec).unwrap();
    let corrupted = swap_word(&a[0][2], 10);

    // The foreign share comes first, but the bad checksum is reported.
    let chosen = [b[0][0].as_str(), a[0][0].as_str(), corrupted.as_str()];
    let err = recover_master_secret(&chosen, b"").unwrap_err();
    assert_eq!(err, Slip39Error::InvalidMnemonicChecksum);
}

#[test]
fn unknown_word_is_reported() {
    let mnemonics = generate_mnemonics(
        &mut OsRng,
        &counting_secret(),
        0,
        None,
        b"",
        1,
        &groups(&[(1, 1)]),
    )
    .unwrap();
    let mut words: Vec<&str> = mnemonics[0][0].split(' ').collect();
    words[7] = "bitcoin";
    let err = check_single_share(&words.join(" ")).unwrap_err();
    assert_eq!(err, Slip39Error::UnknownWord("bitcoin".into()));
    assert_eq!(err.kind(), ErrorKind::Format);
}

// ---------------------------------------------------------------------------
// 5. Passphrase
// ---------------------------------------------------------------------------

#[test]
fn wrong_passphrase_recovers_a_different_secret() {
    let secret = counting_secret();
    let mnemonics = generate_mnemonics(
        &mut OsRng,
        &secret,
        0,
        None,
        b"hunter2",
        1,
        &groups(&[(2, 3)]),
    )
    .unwrap();

    let right = recover_master_secret(&mnemonics[0][..2], b"hunter2").unwrap();
    let wrong = recover_master_secret(&mnemonics[0][..2], b"hunter3").unwrap();
    assert_eq!(*right, secret);
    assert_ne!(*wrong, secret);
    assert_eq!(wrong.len(), secret.len());
}

// ---------------------------------------------------------------------------
// 6. Degenerate Thresholds
// ---------------------------------------------------------------------------

#[test]
fn threshold_one_everywhere_stores_the_ems() {
    let secret = counting_secret();
    let identifier = 500;
    let mnemonics = generate_mnemonics(
        &mut OsRng,
        &secret,
        0,
        Some(identifier),
        b"",
        1,
        &groups(&[(1, 1), (1, 1), (1, 1)]),
    )
    .unwrap();
    let ems = cipher::encrypt(&secret, b"", 0, identifier).unwrap();

    for group in &mnemonics {
        let share = Share::from_mnemonic(&group[0]).unwrap();
        assert_eq!(share.value, *ems);
        assert_eq!(*recover_master_secret(group, b"").unwrap(), secret);
    }
}

// ---------------------------------------------------------------------------
// 7. Incremental Recovery
// ---------------------------------------------------------------------------

#[test]
fn session_recovers_share_by_share() {
    let secret: Vec<u8> = (0u8..24).rev().collect();
    let mnemonics = generate_mnemonics(
        &mut OsRng,
        &secret,
        0,
        None,
        b"",
        2,
        &groups(&[(2, 3), (1, 1), (3, 4)]),
    )
    .unwrap();

    let mut session = RecoverySession::new();
    for mnemonic in [&mnemonics[2][3], &mnemonics[2][0], &mnemonics[0][1]] {
        let progress = session.add_mnemonic(mnemonic).unwrap();
        assert!(!progress.is_complete());
    }
    let progress = session.add_mnemonic(&mnemonics[2][1]).unwrap();
    assert_eq!(progress.groups_complete, 1);
    assert!(!progress.is_complete());

    let progress = session.add_mnemonic(&mnemonics[1][0]).unwrap();
    assert!(progress.is_complete());
    assert_eq!(*session.recover(b"").unwrap(), secret);
}
