//! # charsheet-dice
//!
//! Dice expressions for charsheet: parsing (`"2d6+1x3"`), rolling, and
//! canonical formatting.
//!
//! A dice expression has up to four components: die count, die sides,
//! a flat modifier, and a multiplier applied to the final total. Parsing is
//! permissive: malformed or partial input is normalized rather than
//! rejected, matching how character data files have historically been
//! written by hand.
//!
//! ## Example
//!
//! ```rust
//! use charsheet_dice::Dice;
//!
//! let dice = Dice::parse("2d6+1");
//! assert_eq!(dice.to_string(), "2d+1");
//! let total = dice.roll(false);
//! assert!((3..=13).contains(&total));
//! ```

use std::fmt;

use rand::Rng;

/// A dice specification: `<count>d<sides><+/-modifier>x<multiplier>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dice {
    count: i32,
    sides: i32,
    modifier: i32,
    multiplier: i32,
}

impl Default for Dice {
    /// A single d6.
    fn default() -> Self {
        Self::new(1, 6, 0, 1)
    }
}

impl Dice {
    /// Create a dice specification from its components. Negative counts and
    /// sides are clamped to zero.
    pub fn new(count: i32, sides: i32, modifier: i32, multiplier: i32) -> Self {
        Self {
            count: count.max(0),
            sides: sides.max(0),
            modifier,
            multiplier,
        }
    }

    /// Create `count` d6 dice.
    pub fn d6(count: i32) -> Self {
        Self::new(count, 6, 0, 1)
    }

    /// Parse a dice specification from text.
    ///
    /// Parsing never fails. Missing sides default to 6 when a `d` is
    /// present, a zero multiplier becomes 1, and a bare number with no `d`
    /// ("3") is treated as a flat modifier ("+3").
    pub fn parse(text: &str) -> Self {
        let lowered = text.trim().to_ascii_lowercase();
        let mut rest = lowered.as_str();
        let mut count = extract_value(&mut rest);
        let mut sides = 0;
        let mut modifier = 0;
        let mut multiplier = 0;
        if next_char(rest) == Some('d') {
            rest = &rest[1..];
            sides = extract_value(&mut rest);
            if sides == 0 {
                sides = 6;
            }
            if count < 1 {
                count = 1;
            }
        }
        let ch = next_char(rest);
        if ch == Some('+') || ch == Some('-') {
            let negative = ch == Some('-');
            rest = &rest[1..];
            modifier = extract_value(&mut rest);
            if negative {
                modifier = -modifier;
            }
        }
        if next_char(rest) == Some('x') {
            rest = &rest[1..];
            multiplier = extract_value(&mut rest);
        }
        if multiplier == 0 {
            multiplier = 1;
        }
        if count != 0 && sides == 0 && modifier == 0 {
            modifier = count;
            count = 0;
        }
        Self {
            count,
            sides,
            modifier,
            multiplier,
        }
    }

    /// The number of dice to roll.
    pub fn count(&self) -> i32 {
        self.count
    }

    /// The number of sides on each die.
    pub fn sides(&self) -> i32 {
        self.sides
    }

    /// The bonus or penalty to the roll.
    pub fn modifier(&self) -> i32 {
        self.modifier
    }

    /// The multiplier for the roll.
    pub fn multiplier(&self) -> i32 {
        self.multiplier
    }

    /// Add a modifier to the dice.
    pub fn add(&mut self, modifier: i32) {
        self.modifier += modifier;
    }

    /// Multiply all components.
    pub fn multiply(&mut self, amount: i32) {
        self.count *= amount;
        self.modifier *= amount;
        if self.multiplier != 1 {
            self.multiplier *= amount;
        }
    }

    /// Roll the dice with the thread-local RNG.
    ///
    /// When `extra_dice_from_modifiers` is set, flat modifiers are first
    /// converted into additional average dice.
    pub fn roll(&self, extra_dice_from_modifiers: bool) -> i32 {
        self.roll_with(&mut rand::thread_rng(), extra_dice_from_modifiers)
    }

    /// Roll the dice with a caller-supplied RNG.
    pub fn roll_with<R: Rng + ?Sized>(&self, rng: &mut R, extra_dice_from_modifiers: bool) -> i32 {
        let (count, modifier) = self.normalized(extra_dice_from_modifiers);
        let mut result = 0;
        if self.sides > 0 {
            for _ in 0..count {
                result += rng.gen_range(1..=self.sides);
            }
        }
        (result + modifier) * self.multiplier
    }

    /// Format the specification, optionally converting flat modifiers into
    /// extra average dice first. `Display` uses the unconverted form.
    pub fn to_text(&self, extra_dice_from_modifiers: bool) -> String {
        let (count, modifier) = self.normalized(extra_dice_from_modifiers);
        let mut buffer = String::new();
        if count > 0 && self.sides > 0 {
            buffer.push_str(&count.to_string());
            buffer.push('d');
            if self.sides != 6 {
                buffer.push_str(&self.sides.to_string());
            }
        }
        if modifier > 0 {
            buffer.push('+');
            buffer.push_str(&modifier.to_string());
        } else if modifier < 0 {
            buffer.push_str(&modifier.to_string());
        }
        if self.multiplier != 1 {
            buffer.push('x');
            buffer.push_str(&self.multiplier.to_string());
        }
        if buffer.is_empty() {
            buffer.push('0');
        }
        buffer
    }

    /// Effective (count, modifier) after optional conversion of modifiers
    /// into extra average dice. For odd-sided dice the average is a whole
    /// number; for even-sided dice the extra half means alternating between
    /// one and two dice per conversion step.
    fn normalized(&self, extra_dice_from_modifiers: bool) -> (i32, i32) {
        let mut count = self.count;
        let mut modifier = self.modifier;
        if extra_dice_from_modifiers && self.sides > 0 {
            let average = (self.sides + 1) / 2;
            if self.sides & 1 == 1 {
                count += modifier / average;
                modifier %= average;
            } else {
                while modifier > average {
                    if modifier > 2 * average {
                        modifier -= 2 * average + 1;
                        count += 2;
                    } else {
                        modifier -= average + 1;
                        count += 1;
                    }
                }
            }
        }
        (count, modifier)
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(false))
    }
}

/// Locate a dice specification inside larger text.
///
/// Returns the byte range of the first specification found, with
/// surrounding spaces trimmed, or `None` if the text contains none.
pub fn extract_dice_position(text: &str) -> Option<std::ops::Range<usize>> {
    let bytes = text.as_bytes();
    let mut start: Option<usize> = None;
    let mut max = bytes.len();
    let mut state = 0;
    for (i, &ch) in bytes.iter().enumerate() {
        match state {
            0 => {
                if ch.is_ascii_digit() {
                    if start.is_none() {
                        start = Some(i);
                    }
                } else if ch != b' ' {
                    if ch == b'd' {
                        state = 1;
                    } else if ch == b'+' || ch == b'-' {
                        state = 2;
                    }
                }
            }
            1 => {
                if ch != b' ' && !ch.is_ascii_digit() {
                    state = match ch {
                        b'+' | b'-' => 2,
                        b'x' => 3,
                        _ => 4,
                    };
                }
            }
            2 => {
                if !ch.is_ascii_digit() && ch != b' ' {
                    state = if ch == b'x' { 3 } else { 4 };
                }
            }
            3 => {
                if !ch.is_ascii_digit() && ch != b' ' {
                    state = 4;
                }
            }
            _ => {}
        }
        if state == 4 {
            max = i;
            break;
        }
    }
    let mut start = start?;
    while start < max && bytes[start] == b' ' {
        start += 1;
    }
    let mut last = max.checked_sub(1)?;
    while last > start && bytes[last] == b' ' {
        last -= 1;
    }
    if start < last {
        Some(start..last + 1)
    } else {
        None
    }
}

fn next_char(text: &str) -> Option<char> {
    text.chars().next()
}

/// Consume leading digits (skipping embedded spaces) from the front of the
/// text, returning their value.
fn extract_value(text: &mut &str) -> i32 {
    let mut value: i32 = 0;
    let bytes = text.as_bytes();
    let mut consumed = 0;
    for &ch in bytes {
        if ch.is_ascii_digit() {
            value = value.wrapping_mul(10).wrapping_add(i32::from(ch - b'0'));
        } else if ch != b' ' {
            break;
        }
        consumed += 1;
    }
    *text = &text[consumed..];
    value
}
