use std::fmt::{Display, Formatter, Result as FmtResult};

/// A scheduling resource that has been switched off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailable {
    Teacher,
    Room,
}

impl Unavailable {
    pub fn message(self) -> &'static str {
        match self {
            Unavailable::Teacher => "Teacher is not available",
            Unavailable::Room => "Room is not available",
        }
    }
}

impl Display for Unavailable {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.message())
    }
}

impl std::error::Error for Unavailable {}

/// Gates a new or changed assignment on the availability flags of the
/// resources it references.
///
/// `None` means the resource is not being (re)assigned and is not checked, so
/// existing entries stay valid after a resource is marked unavailable.
pub fn check_availability(
    teacher_available: Option<bool>,
    room_available: Option<bool>,
) -> Result<(), Unavailable> {
    if teacher_available == Some(false) {
        return Err(Unavailable::Teacher);
    }
    if room_available == Some(false) {
        return Err(Unavailable::Room);
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_both_available() {
        assert_eq!(check_availability(Some(true), Some(true)), Ok(()));
    }

    #[test]
    fn test_each_resource_is_distinguished() {
        assert_eq!(
            check_availability(Some(false), Some(true)),
            Err(Unavailable::Teacher)
        );
        assert_eq!(
            check_availability(Some(true), Some(false)),
            Err(Unavailable::Room)
        );
        assert_eq!(
            check_availability(Some(false), Some(false)),
            Err(Unavailable::Teacher)
        );
    }

    #[test]
    fn test_unchecked_resources_pass() {
        assert_eq!(check_availability(None, None), Ok(()));
        assert_eq!(check_availability(None, Some(false)), Err(Unavailable::Room));
    }
}
