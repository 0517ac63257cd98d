//! Python source for each probe.
//!
//! Every snippet catches its own exceptions and writes the result after
//! [`PAYLOAD_MARKER`]: values go to stdout, `str(exc)` goes to stderr with
//! exit status 1. Anything the library prints on its own comes before the
//! marker and is ignored.

pub const PAYLOAD_MARKER: &str = "@@dlpcheck@@";

/// Text written after the last marker in `stream`, if any.
pub fn payload(stream: &str) -> Option<&str> {
    stream
        .rfind(PAYLOAD_MARKER)
        .map(|at| &stream[at + PAYLOAD_MARKER.len()..])
}

/// Run `body` and report `str(exc)` for any `Exception` it raises.
pub fn guarded(body: &str) -> String {
    let mut code = String::from("import sys\ntry:\n");
    for line in body.lines() {
        code.push_str("    ");
        code.push_str(line);
        code.push('\n');
    }
    code.push_str(&format!(
        "except Exception as e:\n    sys.stderr.write('{marker}' + str(e))\n    sys.exit(1)\n",
        marker = PAYLOAD_MARKER
    ));
    code
}

pub fn python_version_snippet() -> String {
    format!("import sys\nsys.stdout.write('{}' + sys.version)\n", PAYLOAD_MARKER)
}

pub fn import_snippet(module: &str, version_attr: &str) -> String {
    let mut code = guarded(&format!(
        "import {module}\n_version = str({module}.{version_attr})"
    ));
    code.push_str(&format!("sys.stdout.write('{}' + _version)\n", PAYLOAD_MARKER));
    code
}

/// The client is opened in a `with` block so it is closed on every path;
/// a failure in `__exit__` is caught like one in the constructor.
pub fn construction_snippet(module: &str, client: &str) -> String {
    guarded(&format!(
        "import {module}\nwith {module}.{client}() as client:\n    pass"
    ))
}
