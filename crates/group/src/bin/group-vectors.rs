//! Generate JSON test vectors for group operations.
//!
//! Usage: group-vectors [OUTPUT]   (default: group-data.json)
//!
//! Set RUST_LOG=debug to see tree growth and imports. Without it no
//! subscriber is installed.

use std::path::PathBuf;

use ark_bn254::Fr;
use membership_group::{fr_to_decimal, fr_to_hex, parse_fr, Group, GroupError};
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn member(prefix: char, zeros: usize) -> Fr {
    parse_fr(&format!("{}{}", prefix, "0".repeat(zeros))).expect("valid member literal")
}

fn decimals(values: &[Fr]) -> Vec<String> {
    values.iter().map(fr_to_decimal).collect()
}

fn state(group: &Group) -> Value {
    json!({
        "root": fr_to_decimal(&group.root()),
        "rootHex": fr_to_hex(&group.root()),
        "depth": group.depth(),
        "size": group.size(),
        "members": decimals(group.members()),
    })
}

fn error_string<T>(result: Result<T, GroupError>) -> Option<String> {
    result.err().map(|e| e.to_string())
}

fn main() {
    // A global subscriber slows rayon's batch rehash badly, so only install
    // one when logs were asked for.
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    }

    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("group-data.json"));

    let initial = [member('1', 29), member('2', 29), member('3', 29)];

    // Empty group
    let empty = Group::new();

    // Initial members
    let seeded = Group::with_members(initial).expect("seed group");

    // Add members
    let added = [member('2', 30), parse_fr(&format!("2{}1", "0".repeat(30))).expect("member")];
    let mut add_group = Group::new();
    add_group.add_members(added).expect("add members");

    // Index lookup
    let missing = parse_fr(&"9".repeat(30)).expect("member");

    // Merkle proof
    let proof = seeded.generate_merkle_proof(0).expect("proof for index 0");
    let proof_error = error_string(seeded.generate_merkle_proof(999));

    // Update member
    let updated_value = member('3', 30);
    let mut update_group = seeded.clone();
    let update_error = error_string(update_group.update_member(999, Fr::from(1u64)));
    update_group.update_member(1, updated_value).expect("update index 1");

    // Remove member
    let mut remove_group = seeded.clone();
    let remove_error = error_string(remove_group.remove_member(999));
    remove_group.remove_member(0).expect("remove index 0");

    // Export / import
    let exported = seeded.export().expect("export");
    let exported_bytes = seeded.export_bytes().expect("export bytes");
    let imported = Group::import(&exported).expect("import");
    let imported_bytes = Group::import_bytes(&exported_bytes).expect("import bytes");

    // Sequential operations
    let mut seq_group = Group::new();
    seq_group.add_members(initial).expect("add members");
    seq_group.add_member(member('4', 29)).expect("add member");
    seq_group.update_member(1, member('5', 29)).expect("update");
    seq_group.remove_member(2).expect("remove");

    let vectors = json!({
        "emptyGroup": {
            "desc": "Empty group",
            "state": state(&empty),
        },
        "initialMembers": {
            "desc": "Group with initial members",
            "members": decimals(&initial),
            "state": state(&seeded),
        },
        "addMembers": {
            "desc": "Adding multiple members",
            "added": decimals(&added),
            "state": state(&add_group),
        },
        "indexLookup": {
            "desc": "Index lookup tests",
            "state": state(&seeded),
            "existing": {
                "member": fr_to_decimal(&initial[1]),
                "index": seeded.index_of(&initial[1]),
            },
            "nonExisting": {
                "member": fr_to_decimal(&missing),
                "index": seeded.index_of(&missing),
            },
        },
        "merkleProof": {
            "desc": "Merkle proof generation",
            "valid": proof,
            "invalidError": proof_error,
        },
        "updateMember": {
            "desc": "Member update",
            "before": decimals(&initial),
            "index": 1,
            "newValue": fr_to_decimal(&updated_value),
            "state": state(&update_group),
            "invalidError": update_error,
        },
        "removeMember": {
            "desc": "Member removal",
            "removed": fr_to_decimal(&initial[0]),
            "state": state(&remove_group),
            "invalidError": remove_error,
        },
        "exportImport": {
            "desc": "Export and import",
            "exported": exported,
            "exportedBytes": format!("0x{}", hex::encode(&exported_bytes)),
            "imported": state(&imported),
            "importedFromBytes": state(&imported_bytes),
        },
        "sequentialOps": {
            "desc": "Sequential operations",
            "initial": decimals(&initial),
            "final": state(&seq_group),
        },
    });

    let pretty = serde_json::to_string_pretty(&vectors).expect("serialize vectors");
    std::fs::write(&output, pretty).expect("write vectors");
    info!(path = %output.display(), "wrote group test vectors");
    println!("Test vectors written to {:?}", output);
}
