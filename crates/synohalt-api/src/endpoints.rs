// Endpoint candidate tables
//
// A logical operation maps to an ordered list of (endpoint-path, API
// namespace, method) triples known to perform it on some firmware
// version, plus the request shape each variant requires. The tables are
// fixed inputs: nothing here is discovered at runtime.

/// How a candidate's request is put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestShape {
    /// Query-string GET with `_sid` appended.
    Get,
    /// Form-encoded POST carrying the bundle identifier.
    FormPost { quoting: IdQuoting },
}

/// Whether the bundle identifier is wrapped in literal percent-encoded
/// double quotes (`%22...%22`) in the form body. A wire-format quirk of
/// the targeted API version; the quoted form must be reproduced
/// byte-for-byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdQuoting {
    Quoted,
    Bare,
}

/// One (path, namespace, method) triple believed capable of performing a
/// logical operation.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub endpoint: &'static str,
    pub api: &'static str,
    pub method: &'static str,
    pub shape: RequestShape,
}

/// API namespace that owns login/logout. Versioned separately (v3);
/// everything else is v1.
pub const AUTH_API: &str = "SYNO.API.Auth";

/// Version number for a given namespace.
pub fn api_version(api: &str) -> u8 {
    if api == AUTH_API { 3 } else { 1 }
}

/// Shutdown candidates, in strict priority order. All use the same shape;
/// the first explicit success short-circuits the rest.
pub const SHUTDOWN_CANDIDATES: &[Candidate] = &[
    Candidate {
        endpoint: "entry.cgi",
        api: "SYNO.Core.System",
        method: "shutdown",
        shape: RequestShape::Get,
    },
    Candidate {
        endpoint: "entry.cgi",
        api: "SYNO.Core.System.Utilization",
        method: "shutdown",
        shape: RequestShape::Get,
    },
    Candidate {
        endpoint: "entry.cgi",
        api: "SYNO.DSM.System",
        method: "shutdown",
        shape: RequestShape::Get,
    },
];

/// Bundle list query.
pub const BUNDLE_LIST: Candidate = Candidate {
    endpoint: "entry.cgi",
    api: "SYNO.Docker.Project",
    method: "list",
    shape: RequestShape::Get,
};

/// Bundle start. The streaming-style method requires the quoted id form
/// and may answer with plain-text log output instead of an envelope.
pub const BUNDLE_START: Candidate = Candidate {
    endpoint: "entry.cgi",
    api: "SYNO.Docker.Project",
    method: "start_stream",
    shape: RequestShape::FormPost {
        quoting: IdQuoting::Quoted,
    },
};

/// Bundle stop candidates: quoted id first, bare id retried on explicit
/// failure.
pub const BUNDLE_STOP_CANDIDATES: &[Candidate] = &[
    Candidate {
        endpoint: "entry.cgi",
        api: "SYNO.Docker.Project",
        method: "stop",
        shape: RequestShape::FormPost {
            quoting: IdQuoting::Quoted,
        },
    },
    Candidate {
        endpoint: "entry.cgi",
        api: "SYNO.Docker.Project",
        method: "stop",
        shape: RequestShape::FormPost {
            quoting: IdQuoting::Bare,
        },
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_api_is_versioned_separately() {
        assert_eq!(api_version(AUTH_API), 3);
        assert_eq!(api_version("SYNO.Core.System"), 1);
        assert_eq!(api_version("SYNO.Docker.Project"), 1);
    }

    #[test]
    fn shutdown_candidates_keep_priority_order() {
        let apis: Vec<&str> = SHUTDOWN_CANDIDATES.iter().map(|c| c.api).collect();
        assert_eq!(
            apis,
            [
                "SYNO.Core.System",
                "SYNO.Core.System.Utilization",
                "SYNO.DSM.System"
            ]
        );
    }

    #[test]
    fn stop_tries_quoted_before_bare() {
        let shapes: Vec<RequestShape> = BUNDLE_STOP_CANDIDATES.iter().map(|c| c.shape).collect();
        assert_eq!(
            shapes,
            [
                RequestShape::FormPost {
                    quoting: IdQuoting::Quoted
                },
                RequestShape::FormPost {
                    quoting: IdQuoting::Bare
                },
            ]
        );
    }
}
