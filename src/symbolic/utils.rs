// the collection of utility functions mainly for bracket parsing and grids

/// Byte position of the closing bracket paired with the opening bracket at
/// byte position `bracket_start`.
pub fn find_pair_to_this_bracket(input: &str, bracket_start: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (i, c) in input.char_indices() {
        if i < bracket_start {
            continue;
        }
        if c == '(' {
            depth += 1;
        } else if c == ')' {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Rightmost occurrence of one of `operators` at bracket depth zero that acts
/// as a binary operator, as a byte position suitable for slicing. Splitting at
/// the rightmost occurrence keeps `+ - * /` left-associative.
pub fn find_rightmost_binary_operator(input: &str, operators: &[char]) -> Option<(usize, char)> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut depth = 0i32;
    let mut found = None;
    for (i, &(byte_pos, c)) in chars.iter().enumerate() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ if depth == 0 && operators.contains(&c) && is_binary_position(&chars, i) => {
                found = Some((byte_pos, c));
            }
            _ => {}
        }
    }
    found
}

// A '+' or '-' directly after another operator, after an opening bracket, at
// the start of the fragment, or inside the exponent of a float literal
// ("1e-3") is a sign, not a binary operator.
fn is_binary_position(chars: &[(usize, char)], pos: usize) -> bool {
    let mut j = pos;
    loop {
        if j == 0 {
            return false;
        }
        j -= 1;
        if !chars[j].1.is_whitespace() {
            break;
        }
    }
    let prev = chars[j].1;
    if matches!(prev, '+' | '-' | '*' | '/' | '^' | '(') {
        return false;
    }
    if (prev == 'e' || prev == 'E')
        && j > 0
        && (chars[j - 1].1.is_ascii_digit() || chars[j - 1].1 == '.')
    {
        return false;
    }
    true
}

/// Leftmost occurrence of `operator` at bracket depth zero, as a byte
/// position. Splitting the power operator at the leftmost occurrence keeps it
/// right-associative.
pub fn find_leftmost_operator_outside_brackets(input: &str, operator: char) -> Option<usize> {
    let mut depth = 0i32;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ if depth == 0 && c == operator => return Some(i),
            _ => {}
        }
    }
    None
}

pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    let mut values = Vec::with_capacity(num_values);
    let step = (end - start) / (num_values as f64 - 1.0);

    for i in 0..num_values {
        values.push(start + (i as f64 * step));
    }

    values
}

/// Half-open grid `[start, end)` with the given step, the np.arange convention.
pub fn arange(start: f64, end: f64, step: f64) -> Vec<f64> {
    let mut values = Vec::new();
    let mut x = start;
    while x < end {
        values.push(x);
        x += step;
    }
    values
}
