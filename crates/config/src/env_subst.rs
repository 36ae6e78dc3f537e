/// Replace `${VAR}` and `${VAR:-default}` placeholders in a config string.
///
/// A placeholder with no matching environment variable and no default is
/// left verbatim so the failure is visible downstream.
pub fn substitute_env(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 2..];
        match tail.find('}') {
            Some(end) => {
                let inner = &tail[..end];
                let (name, default) = match inner.split_once(":-") {
                    Some((n, d)) => (n, Some(d)),
                    None => (inner, None),
                };
                if name.is_empty() {
                    out.push_str("${");
                    out.push_str(inner);
                    out.push('}');
                } else {
                    match std::env::var(name) {
                        Ok(val) => out.push_str(&val),
                        Err(_) => match default {
                            Some(d) => out.push_str(d),
                            None => {
                                out.push_str("${");
                                out.push_str(inner);
                                out.push('}');
                            },
                        },
                    }
                }
                rest = &tail[end + 1..];
            },
            None => {
                // Unterminated placeholder, emit literally.
                out.push_str("${");
                rest = tail;
            },
        }
    }

    out.push_str(rest);
    out
}
