use crate::areas::site::OpenSite;
use crate::artifacts::links::LinkValidator;
use crate::config::Settings;
use crate::errors::{CompareFailure, ConfigurationError, Side};
use std::cell::{RefCell, RefMut};
use std::io::Write;

/// Everything a command needs: loaded settings, the link validator, and the
/// writer the report goes to (stdout, the pager, or a buffer in tests).
pub struct Session {
    writer: RefCell<Box<dyn Write>>,
    settings: Settings,
    validator: Box<dyn LinkValidator>,
}

impl Session {
    pub fn new(
        settings: Settings,
        validator: Box<dyn LinkValidator>,
        writer: Box<dyn Write>,
    ) -> Self {
        Session {
            writer: RefCell::new(writer),
            settings,
            validator,
        }
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn Write>> {
        self.writer.borrow_mut()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn validator(&self) -> &dyn LinkValidator {
        self.validator.as_ref()
    }

    /// Open both sites, reporting every side that cannot be reached.
    pub fn open_sites(
        &self,
        left: &str,
        right: &str,
    ) -> Result<(OpenSite, OpenSite), CompareFailure> {
        let opened_left = OpenSite::open(left, &self.settings)
            .map_err(|problem| ConfigurationError::new(Side::Left, left, problem));
        let opened_right = OpenSite::open(right, &self.settings)
            .map_err(|problem| ConfigurationError::new(Side::Right, right, problem));

        match (opened_left, opened_right) {
            (Ok(left), Ok(right)) => Ok((left, right)),
            (left, right) => Err(CompareFailure::new(
                [left.err(), right.err()].into_iter().flatten().collect(),
            )),
        }
    }
}
