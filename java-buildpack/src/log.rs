use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

// Indentation the platform expects for lines that belong to the preceding `-----> ` header.
const INFO_INDENT: &str = "       ";

/// Logs a step header in the `-----> Title` style the staging platform renders as a section.
pub fn log_header(title: impl AsRef<str>) {
    let mut stream = StandardStream::stdout(ColorChoice::Always);
    // Output failures are not actionable during staging.
    let _ = write_styled_message(
        &mut stream,
        format!("-----> {}", title.as_ref()),
        ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true),
    )
    .and_then(|()| stream.flush());
}

/// Logs informational lines, indented so they line up below the preceding header.
pub fn log_info(message: impl AsRef<str>) {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    let _ = message
        .as_ref()
        .split('\n')
        .try_for_each(|line| writeln!(lock, "{INFO_INDENT}{line}"))
        .and_then(|()| lock.flush());
}

pub fn log_warning(header: impl AsRef<str>, body: impl AsRef<str>) {
    let mut stream = StandardStream::stderr(ColorChoice::Always);
    let _ = write_styled_message(
        &mut stream,
        format!("\n[Warning: {}]", header.as_ref()),
        ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true),
    )
    .and_then(|()| {
        write_styled_message(
            &mut stream,
            body,
            ColorSpec::new().set_fg(Some(Color::Yellow)),
        )
    })
    .and_then(|()| stream.flush());
}

pub fn log_error(header: impl AsRef<str>, body: impl AsRef<str>) {
    let mut stream = StandardStream::stderr(ColorChoice::Always);
    let _ = write_styled_message(
        &mut stream,
        format!("\n[Error: {}]", header.as_ref()),
        ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true),
    )
    .and_then(|()| {
        write_styled_message(&mut stream, body, ColorSpec::new().set_fg(Some(Color::Red)))
    })
    .and_then(|()| stream.flush());
}

// Styles each line of text separately, so that when staging output is streamed to the
// user (and prefixes like `remote:` added) the line colour doesn't leak into the prefixes.
fn write_styled_message(
    stream: &mut impl WriteColor,
    message: impl AsRef<str>,
    spec: &ColorSpec,
) -> io::Result<()> {
    // `.split('\n')` rather than `.lines()` keeps trailing newlines of the message intact.
    for line in message.as_ref().split('\n') {
        stream.set_color(spec)?;
        write!(stream, "{line}")?;
        stream.reset()?;
        writeln!(stream)?;
    }
    Ok(())
}
