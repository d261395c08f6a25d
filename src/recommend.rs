use itertools::Itertools;

/// Remediation advice for a classification label.
///
/// Labels without a dedicated entry get a generic pointer that still
/// names the label, so the output never goes silent on an unfamiliar
/// category.
pub fn advice_for(label: &str) -> String {
    let advice = match label {
        "connection_refused" => {
            "Verify the target service is running and listening on the expected port, and check firewall or security-group rules between the hosts."
        }
        "connection_reset" => {
            "Look for the peer closing connections early: load balancer idle timeouts, service restarts, or keepalive settings that disagree across hops."
        }
        "connection_failed" => {
            "Check DNS resolution and network reachability to the remote host, and confirm the endpoint address in configuration is current."
        }
        "null_pointer" => {
            "Inspect the referenced code path for missing null checks or uninitialized state; the surrounding stack trace identifies the dereference site."
        }
        "out_of_memory" => {
            "Raise the memory limit or reduce the working set; check for leaks with heap profiling and review recent changes to batch or cache sizes."
        }
        "segfault" => {
            "Capture a core dump and inspect the faulting address; native-extension and FFI boundaries are the usual suspects."
        }
        "panic" => {
            "Read the panic message and backtrace to find the failing invariant; panics in request paths usually deserve a recoverable error instead."
        }
        "timeout" => {
            "Compare the configured timeout against observed latency of the downstream call, and add retries with backoff if the dependency is intermittently slow."
        }
        "auth_failure" => {
            "Confirm the credentials or tokens in use are current and not expired, and check clock skew between the client and the authentication service."
        }
        "permission_denied" => {
            "Review file modes, service-account roles, or ACLs for the denied resource; the principal in the log line shows which identity needs the grant."
        }
        "disk_space" => {
            "Free disk space or expand the volume; rotate or compress old logs and check for runaway temp or core files."
        }
        "deadlock" => {
            "Identify the lock cycle from the thread dump and impose a consistent acquisition order, or narrow the critical sections involved."
        }
        "database_error" => {
            "Check database availability and connection-pool saturation, and review recent schema or query changes around the timestamps involved."
        }
        "tls_error" => {
            "Validate the certificate chain and expiry dates on both ends, and confirm the negotiated protocol versions and cipher suites overlap."
        }
        "exception" => {
            "Use the stack trace to locate the throwing frame; recurring identical traces usually point at one unhandled edge case."
        }
        "deprecation" => {
            "Plan a migration off the deprecated interface before the removal release; pin versions in the meantime to avoid surprise breakage."
        }
        "fatal" => {
            "Treat as an availability incident: find the first fatal entry, since later ones are usually cascade effects of the initial failure."
        }
        "generic_error" => {
            "Group the error lines by their masked pattern to find the dominant failure, then drill into the most frequent template first."
        }
        "generic_warning" => {
            "Review whether the warnings are actionable or noise; recurring warnings that precede errors deserve promotion to alerts."
        }
        "debug_noise" => {
            "Lower the log verbosity in production if debug output dominates; it inflates volume and buries actionable entries."
        }
        _ => {
            return format!(
                "No specific guidance available for `{label}`; review the matching lines manually."
            );
        }
    };
    advice.to_string()
}

/// Advice for the first `k` labels, deduplicated, order preserved.
///
/// `labels` is expected sorted by descending frequency, so this yields
/// guidance for the dominant categories first.
pub fn recommend(labels: &[&str], k: usize) -> Vec<String> {
    labels
        .iter()
        .copied()
        .take(k)
        .unique()
        .map(advice_for)
        .collect()
}
