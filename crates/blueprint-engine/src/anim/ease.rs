use std::fmt;
use std::str::FromStr;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EaseMode {
    In,
    Out,
    InOut,
}

/// Easing curve.
///
/// `Power(n, _)` uses exponent `n + 1`: `power1` is quadratic, `power4`
/// quintic. Names parse as `"none"`, `"linear"`, `"powerN"` (out) or
/// `"powerN.in|out|inOut"`; `power0` is linear.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Ease {
    Linear,
    Power(u8, EaseMode),
}

impl Default for Ease {
    fn default() -> Self {
        Ease::Power(1, EaseMode::Out)
    }
}

impl Ease {
    pub const NONE: Ease = Ease::Linear;

    /// Maps linear progress to eased progress. Input is clamped to `[0, 1]`.
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Ease::Linear => t,
            Ease::Power(0, _) => t,
            Ease::Power(n, mode) => {
                let p = i32::from(n) + 1;
                match mode {
                    EaseMode::In => t.powi(p),
                    EaseMode::Out => 1.0 - (1.0 - t).powi(p),
                    EaseMode::InOut => {
                        if t < 0.5 {
                            (2.0 * t).powi(p) / 2.0
                        } else {
                            1.0 - (2.0 * (1.0 - t)).powi(p) / 2.0
                        }
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EaseParseError(String);

impl fmt::Display for EaseParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown ease `{}`", self.0)
    }
}

impl std::error::Error for EaseParseError {}

impl FromStr for Ease {
    type Err = EaseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || EaseParseError(s.to_string());
        let s = s.trim();
        if s == "none" || s == "linear" {
            return Ok(Ease::Linear);
        }

        let (family, mode) = s.split_once('.').unwrap_or((s, "out"));
        let power: u8 = family
            .strip_prefix("power")
            .and_then(|n| n.parse().ok())
            .filter(|n| *n <= 4)
            .ok_or_else(err)?;
        let mode = match mode {
            "in" => EaseMode::In,
            "out" => EaseMode::Out,
            "inOut" => EaseMode::InOut,
            _ => return Err(err()),
        };

        Ok(if power == 0 { Ease::Linear } else { Ease::Power(power, mode) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn endpoints_are_fixed() {
        for ease in ["none", "power1.in", "power2.out", "power3.inOut", "power4"] {
            let e: Ease = ease.parse().unwrap();
            assert!(close(e.apply(0.0), 0.0), "{ease}");
            assert!(close(e.apply(1.0), 1.0), "{ease}");
        }
    }

    #[test]
    fn power_curves() {
        assert!(close(Ease::Power(1, EaseMode::In).apply(0.5), 0.25));
        assert!(close(Ease::Power(1, EaseMode::Out).apply(0.5), 0.75));
        assert!(close(Ease::Power(2, EaseMode::InOut).apply(0.5), 0.5));
        assert!(close(Ease::Power(2, EaseMode::InOut).apply(0.25), 0.0625));
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Ease::Linear.apply(-1.0), 0.0);
        assert_eq!(Ease::Linear.apply(2.0), 1.0);
        assert_eq!(Ease::Linear.apply(f32::NAN), 0.0);
    }

    #[test]
    fn parse_names() {
        assert_eq!("power2.inOut".parse::<Ease>(), Ok(Ease::Power(2, EaseMode::InOut)));
        assert_eq!("power1".parse::<Ease>(), Ok(Ease::Power(1, EaseMode::Out)));
        assert_eq!("power0.in".parse::<Ease>(), Ok(Ease::Linear));
        assert_eq!(Ease::default(), Ease::Power(1, EaseMode::Out));
        assert!("power5.in".parse::<Ease>().is_err());
        assert!("elastic.out".parse::<Ease>().is_err());
        assert!("power2.sideways".parse::<Ease>().is_err());
    }
}
