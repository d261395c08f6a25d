use logtriage::masking::{mask_line, pattern_signature};

#[test]
fn masks_timestamps_ips_emails_and_numbers() {
    let input = "User 123 logged in from 192.168.1.1 at 2024-01-01T12:00:00Z contact john.doe@example.com";
    let masked = mask_line(input);
    assert_eq!(masked, "User <NUM> logged in from <IP> at <TS> contact <EMAIL>");
}

#[test]
fn masks_uuid_path_url_and_hex() {
    let input = "uuid=550e8400-e29b-41d4-a716-446655440000 path=/var/log/app/error.log url=https://example.com/a?b=1 hex=deadbeefcafebabe";
    let masked = mask_line(input);
    assert!(masked.contains("uuid=<ID>"), "{masked}");
    assert!(masked.contains("path=<PATH>"), "{masked}");
    assert!(masked.contains("url=<URL>"), "{masked}");
    assert!(masked.contains("hex=<HEX>"), "{masked}");
}

#[test]
fn unit_suffixes_survive_number_masking() {
    let masked = mask_line("call took 15.3ms, sent 120MB, queue at 99%");
    assert_eq!(masked, "call took <NUM>ms, sent <NUM>MB, queue at <NUM>%");
}

#[test]
fn bare_clock_times_become_timestamps() {
    let masked = mask_line("job retried at 11:22:33 and again at 11:22:59.120");
    assert_eq!(masked, "job retried at <TS> and again at <TS>");
}

#[test]
fn ipv4_with_port_masks_as_one_address() {
    let masked = mask_line("dialing 10.0.0.5:8080 failed");
    assert_eq!(masked, "dialing <IP> failed");
}

#[test]
fn full_ipv6_is_not_mistaken_for_clock_times() {
    let masked = mask_line("peer 2001:0db8:85a3:0000:0000:8a2e:0370:7334 dropped");
    assert_eq!(masked, "peer <IP> dropped");
}

#[test]
fn lines_differing_only_in_parameters_share_a_signature() {
    let a = pattern_signature("timeout", "request to shard 3 timed out after 120ms");
    let b = pattern_signature("timeout", "request to shard 9 timed out after 450ms");
    assert_eq!(a, b);
}

#[test]
fn signature_is_prefixed_with_the_label() {
    let sig = pattern_signature("disk_space", "WARN: disk at 90%");
    assert_eq!(sig, "disk_space: WARN: disk at <NUM>%");
}

#[test]
fn masking_is_idempotent() {
    let inputs = [
        "ERROR at 2024-05-01 10:11:12 from 10.1.2.3",
        "took 42ms for /srv/data/blob.bin",
        "id 550e8400-e29b-41d4-a716-446655440000 retried 3 times",
    ];
    for input in inputs {
        let once = mask_line(input);
        let twice = mask_line(&once);
        assert_eq!(once, twice, "input: {input}");
    }
}

#[test]
fn repeated_lookups_hit_the_cache_consistently() {
    let input = "worker 17 finished batch 88 in 250ms";
    let first = mask_line(input);
    for _ in 0..50 {
        assert_eq!(mask_line(input), first);
    }
}
