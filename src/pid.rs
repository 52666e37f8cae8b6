//! Values derived from the personality identifier, and PID regeneration.

use rand::RngCore;

use crate::{
    personal::{GENDER_FEMALE_ONLY, GENDER_MALE_ONLY, GENDER_UNKNOWN},
    Gender, Generation, TrainerId,
};

/// Upper bound on random draws when searching for a PID.
pub const MAX_PID_ATTEMPTS: u32 = 0x0010_0000;

pub fn psv(pid: u32, generation: Generation) -> u16 {
    (((pid >> 16) ^ (pid & 0xffff)) as u16) >> generation.shiny_shift()
}

pub fn is_shiny(pid: u32, id: TrainerId, generation: Generation) -> bool {
    id.tsv(generation) == psv(pid, generation)
}

/// Raw xor of the trainer id halves and the PID halves.
pub fn shiny_xor(pid: u32, id: TrainerId) -> u16 {
    ((pid >> 16) as u16) ^ (pid as u16) ^ id.public_id ^ id.secret_id
}

pub fn gender_from_pid(pid: u32, gender_ratio: u8) -> Gender {
    match gender_ratio {
        GENDER_UNKNOWN => Gender::Genderless,
        GENDER_FEMALE_ONLY => Gender::Female,
        GENDER_MALE_ONLY => Gender::Male,
        ratio if ((pid & 0xff) as u8) < ratio => Gender::Female,
        _ => Gender::Male,
    }
}

pub fn nature_from_pid(pid: u32) -> u8 {
    (pid % 25) as u8
}

/// Unown letter from the low two bits of each PID byte.
pub fn unown_form_from_pid(pid: u32) -> u8 {
    let letter = ((pid >> 18) & 0xc0) | ((pid >> 12) & 0x30) | ((pid >> 6) & 0x0c) | (pid & 0x03);
    (letter % 28) as u8
}

/// Which PID bit selects the ability slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbilityBit {
    /// Bit 0, as in generation four.
    Low(u8),
    /// Bit 16, as in generation five.
    High(u8),
}

/// Properties a regenerated PID has to reproduce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PidConstraints {
    pub gender: Option<(Gender, u8)>,
    pub nature: Option<u8>,
    pub ability: Option<AbilityBit>,
    pub unown_form: Option<u8>,
}

impl PidConstraints {
    pub fn matches(&self, pid: u32) -> bool {
        if let Some((gender, ratio)) = self.gender {
            let fixed = matches!(ratio, GENDER_MALE_ONLY | GENDER_FEMALE_ONLY | GENDER_UNKNOWN);
            if !fixed && gender_from_pid(pid, ratio) != gender {
                return false;
            }
        }
        if let Some(nature) = self.nature {
            if nature_from_pid(pid) != nature {
                return false;
            }
        }
        match self.ability {
            Some(AbilityBit::Low(bit)) if (pid & 1) as u8 != bit => return false,
            Some(AbilityBit::High(bit)) if ((pid >> 16) & 1) as u8 != bit => return false,
            _ => {}
        }
        if let Some(form) = self.unown_form {
            if unown_form_from_pid(pid) != form {
                return false;
            }
        }
        true
    }
}

/// Draws PIDs until one has the requested shininess and satisfies `constraints`.
///
/// Shiny candidates are built directly from the trainer id, so only the remaining
/// constraints are rejected. Returns `None` after [`MAX_PID_ATTEMPTS`] draws.
pub fn regenerate_pid(
    id: TrainerId,
    generation: Generation,
    shiny: bool,
    constraints: &PidConstraints,
    rng: &mut dyn RngCore,
) -> Option<u32> {
    let shift = generation.shiny_shift();
    for _ in 0..MAX_PID_ATTEMPTS {
        let draw = rng.next_u32();
        let pid = if shiny {
            let low = draw & 0xffff;
            let noise = (draw >> 16) & ((1 << shift) - 1);
            let high = (id.public_id ^ id.secret_id) as u32 ^ low ^ noise;
            (high & 0xffff) << 16 | low
        } else {
            draw
        };
        if is_shiny(pid, id, generation) != shiny {
            continue;
        }
        if constraints.matches(pid) {
            return Some(pid);
        }
    }
    log::warn!("No PID satisfied {constraints:?} (shiny: {shiny}) within {MAX_PID_ATTEMPTS} draws");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn shiny_value_uses_generation_shift() {
        let id = TrainerId::new(12345, 54321);
        let pid = ((12345u32 ^ 54321) ^ 0x1234) << 16 | 0x1234;
        assert!(is_shiny(pid, id, Generation::Four));
        assert!(is_shiny(pid, id, Generation::Seven));
        let near = pid ^ 0x000c_0000;
        assert!(!is_shiny(near, id, Generation::Four));
        assert!(is_shiny(near, id, Generation::Seven));
    }

    #[test]
    fn gender_threshold_compares_low_byte() {
        assert_eq!(gender_from_pid(0x0000_001e, 31), Gender::Female);
        assert_eq!(gender_from_pid(0x0000_001f, 31), Gender::Male);
        assert_eq!(gender_from_pid(0xffff_ffff, GENDER_UNKNOWN), Gender::Genderless);
        assert_eq!(gender_from_pid(0, GENDER_FEMALE_ONLY), Gender::Female);
    }

    #[test]
    fn regenerated_pids_honour_constraints() {
        let mut rng = StdRng::seed_from_u64(7);
        let id = TrainerId::new(24601, 1337);
        let constraints = PidConstraints {
            gender: Some((Gender::Female, 127)),
            nature: Some(13),
            ability: Some(AbilityBit::Low(1)),
            unown_form: None,
        };
        for shiny in [true, false] {
            let pid = regenerate_pid(id, Generation::Four, shiny, &constraints, &mut rng)
                .expect("pid within bound");
            assert_eq!(is_shiny(pid, id, Generation::Four), shiny);
            assert!(constraints.matches(pid));
        }
    }

    #[test]
    fn fixed_gender_species_ignore_gender_constraint() {
        let constraints = PidConstraints {
            gender: Some((Gender::Female, GENDER_UNKNOWN)),
            ..Default::default()
        };
        assert!(constraints.matches(0));
    }
}
