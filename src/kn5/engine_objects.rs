//! Names the simulation engine gives a meaning to (grid slots, pits, timing gates, ...).
//! Empties with these names are expected to carry no geometry.

#[derive(Debug, Clone, Copy)]
enum Tail {
    /// One or more ASCII digits, then the given suffix.
    Number(&'static str),
    Any,
    Nothing,
}

const ENGINE_OBJECTS: &[(&str, Tail)] = &[
    ("AC_START_", Tail::Number("")),
    ("AC_PIT_", Tail::Number("")),
    ("AC_TIME_", Tail::Number("_L")),
    ("AC_TIME_", Tail::Number("_R")),
    ("AC_HOTLAP_START_", Tail::Number("")),
    ("AC_OPEN_FINISH_R", Tail::Nothing),
    ("AC_OPEN_FINISH_L", Tail::Nothing),
    ("AC_OPEN_START_L", Tail::Nothing),
    ("AC_OPEN_START_R", Tail::Nothing),
    ("AC_AUDIO_", Tail::Any),
    ("AC_CREW_", Tail::Number("")),
];

pub fn is_engine_object(name: &str) -> bool {
    ENGINE_OBJECTS.iter().any(|(prefix, tail)| {
        let Some(rest) = name.strip_prefix(*prefix) else {
            return false;
        };

        match tail {
            Tail::Nothing => rest.is_empty(),
            Tail::Any => !rest.is_empty(),
            Tail::Number(suffix) => rest.strip_suffix(*suffix).is_some_and(|digits| {
                !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
            }),
        }
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("AC_START_0", true)]
    #[case("AC_START_12", true)]
    #[case("AC_START_", false)]
    #[case("AC_START_A", false)]
    #[case("ac_start_0", false)]
    #[case("AC_PIT_3", true)]
    #[case("AC_TIME_0_L", true)]
    #[case("AC_TIME_10_R", true)]
    #[case("AC_TIME_0", false)]
    #[case("AC_TIME__L", false)]
    #[case("AC_HOTLAP_START_0", true)]
    #[case("AC_OPEN_FINISH_R", true)]
    #[case("AC_OPEN_START_L", true)]
    #[case("AC_OPEN_START_L2", false)]
    #[case("AC_AUDIO_crowd", true)]
    #[case("AC_AUDIO_", false)]
    #[case("AC_CREW_1", true)]
    #[case("Empty", false)]
    fn engine_object_names(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_engine_object(name), expected);
    }
}
