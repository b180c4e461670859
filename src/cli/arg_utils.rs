// arg_utils.rs: small parsers shared by the argument and environment layers.

/// Parses an unsigned 32-bit integer from the start of `s`.
///
/// Returns `None` if `s` does not start with a digit or the value overflows,
/// otherwise `Some((value, remainder))` with the unconsumed tail of `s`.
pub fn read_u32_from_str(s: &str) -> Option<(u32, &str)> {
    let end = s.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    let value = s[..end].parse::<u32>().ok()?;
    Some((value, &s[end..]))
}

/// Parses a `WxH` pair such as `640x480` (an upper-case `X` is accepted too).
pub fn parse_dimensions(s: &str) -> Result<(usize, usize), String> {
    let bad = || format!("expected WIDTHxHEIGHT, got '{s}'");
    let (w, rest) = read_u32_from_str(s).ok_or_else(bad)?;
    let rest = rest
        .strip_prefix('x')
        .or_else(|| rest.strip_prefix('X'))
        .ok_or_else(bad)?;
    let (h, tail) = read_u32_from_str(rest).ok_or_else(bad)?;
    if !tail.is_empty() {
        return Err(bad());
    }
    if w == 0 || h == 0 {
        return Err(format!("dimensions must be non-zero, got '{s}'"));
    }
    Ok((w as usize, h as usize))
}

/// Parses a block grid `WxH`, each side in `1..=255`.
pub fn parse_block_grid(s: &str) -> Result<(u8, u8), String> {
    let (w, h) = parse_dimensions(s)?;
    let w = u8::try_from(w).map_err(|_| format!("at most 255 blocks per axis, got {w}"))?;
    let h = u8::try_from(h).map_err(|_| format!("at most 255 blocks per axis, got {h}"))?;
    Ok((w, h))
}
