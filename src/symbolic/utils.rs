// the collection of utility functions for bracket scanning, shared by the
// leaf parser and the operator grammar matcher

/// checks that every '(' has a matching ')' and depth never goes negative
pub fn parens_balanced(s: &str) -> bool {
    let mut depth: i32 = 0;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// byte index of the ')' matching the '(' at byte index `open_idx`
pub fn find_matching_paren(s: &str, open_idx: usize) -> Option<usize> {
    let mut depth = 0;
    for (i, c) in s.char_indices() {
        if i < open_idx {
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

/// byte index of the first occurrence of `target` at bracket depth zero
pub fn find_char_outside_parens(s: &str, target: char) -> Option<usize> {
    let mut depth = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ if c == target && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

// the rightmost occurrence wins so that same-precedence chains split
// left-associatively: a - b + c  =>  (a - b) + c
pub fn find_rightmost_outside_parens(s: &str, operators: &[char]) -> Option<(usize, char)> {
    let mut depth = 0;
    let mut found = None;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ if depth == 0 && operators.contains(&c) => found = Some((i, c)),
            _ => {}
        }
    }
    found
}

/// byte index of the first depth-zero comma, used for definite-integral bounds
pub fn find_top_level_comma(s: &str) -> Option<usize> {
    find_char_outside_parens(s, ',')
}
