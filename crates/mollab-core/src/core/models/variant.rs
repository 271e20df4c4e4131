use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The attribute layout a particle was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleStyle {
    /// LAMMPS `full` atom style: atom id, molecule id, type and partial charge.
    Full,
    /// LAMMPS `molecular` atom style: atom id, molecule id and numeric type.
    Molecular,
    /// Protein Data Bank `ATOM`/`HETATM` record.
    Pdb,
}

static STYLE_NAMES: Map<&'static str, ParticleStyle> = phf_map! {
    "full" => ParticleStyle::Full,
    "molecular" => ParticleStyle::Molecular,
    "pdb" => ParticleStyle::Pdb,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown particle style '{0}'")]
pub struct ParseStyleError(pub String);

impl FromStr for ParticleStyle {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        STYLE_NAMES
            .get(s.trim().to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| ParseStyleError(s.to_string()))
    }
}

impl fmt::Display for ParticleStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Full => "full",
                Self::Molecular => "molecular",
                Self::Pdb => "pdb",
            }
        )
    }
}

/// Fields of a PDB coordinate record, excluding the coordinates themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct PdbFields {
    pub serial: usize,           // Atom serial number, the record's identity
    pub name: String,            // Atom name (e.g., "CA")
    pub alt_loc: Option<char>,   // Alternate location indicator
    pub res_name: String,        // Residue name (e.g., "GLY")
    pub chain_id: char,          // Chain identifier
    pub res_seq: isize,          // Residue sequence number
    pub occupancy: f64,          // Occupancy
    pub temp_factor: f64,        // Temperature factor
    pub element: String,         // Element symbol
    pub charge: Option<i8>,      // Formal charge
}

impl PdbFields {
    /// Creates a record with full occupancy, zero temperature factor, no alternate
    /// location and no formal charge.
    pub fn new(
        serial: usize,
        name: &str,
        res_name: &str,
        chain_id: char,
        res_seq: isize,
        element: &str,
    ) -> Self {
        Self {
            serial,
            name: name.to_string(),
            alt_loc: None,
            res_name: res_name.to_string(),
            chain_id,
            res_seq,
            occupancy: 1.0,
            temp_factor: 0.0,
            element: element.to_string(),
            charge: None,
        }
    }
}

/// Format-specific payload carried by a particle.
///
/// Each variant supplies an explicit identity ([`ParticleKind::id`]) independent of the
/// identity allocated for the entity.
#[derive(Debug, Clone, PartialEq)]
pub enum ParticleKind {
    Full {
        atom_id: usize,
        mol_id: usize,
        atom_type: String,
        charge: f64,
    },
    Molecular {
        atom_id: usize,
        mol_id: usize,
        type_id: usize,
    },
    Pdb(PdbFields),
}

impl ParticleKind {
    pub fn full(atom_id: usize, mol_id: usize, atom_type: &str, charge: f64) -> Self {
        Self::Full {
            atom_id,
            mol_id,
            atom_type: atom_type.to_string(),
            charge,
        }
    }

    pub fn molecular(atom_id: usize, mol_id: usize, type_id: usize) -> Self {
        Self::Molecular {
            atom_id,
            mol_id,
            type_id,
        }
    }

    pub fn style(&self) -> ParticleStyle {
        match self {
            Self::Full { .. } => ParticleStyle::Full,
            Self::Molecular { .. } => ParticleStyle::Molecular,
            Self::Pdb(_) => ParticleStyle::Pdb,
        }
    }

    pub fn id(&self) -> usize {
        match self {
            Self::Full { atom_id, .. } | Self::Molecular { atom_id, .. } => *atom_id,
            Self::Pdb(fields) => fields.serial,
        }
    }

    /// Label given to a particle created from this payload.
    pub(crate) fn default_label(&self) -> String {
        match self {
            Self::Pdb(fields) => fields.name.clone(),
            _ => self.id().to_string(),
        }
    }

    /// Type label given to a particle created from this payload, if the format carries one.
    pub(crate) fn default_type(&self) -> Option<String> {
        match self {
            Self::Full { atom_type, .. } => Some(atom_type.clone()),
            Self::Molecular { type_id, .. } => Some(type_id.to_string()),
            Self::Pdb(_) => None,
        }
    }

    /// Looks up a format-specific field by name, rendered as text.
    ///
    /// Returns `None` for names this payload does not carry and for unset optional fields.
    pub fn field(&self, name: &str) -> Option<String> {
        match (self, name) {
            (_, "id") => Some(self.id().to_string()),
            (Self::Full { mol_id, .. } | Self::Molecular { mol_id, .. }, "mol_id") => {
                Some(mol_id.to_string())
            }
            (Self::Full { charge, .. }, "charge") => Some(charge.to_string()),
            (Self::Molecular { type_id, .. }, "type_id") => Some(type_id.to_string()),
            (Self::Pdb(fields), _) => match name {
                "serial" => Some(fields.serial.to_string()),
                "name" => Some(fields.name.clone()),
                "alt_loc" => fields.alt_loc.map(String::from),
                "res_name" => Some(fields.res_name.clone()),
                "chain_id" => Some(fields.chain_id.to_string()),
                "res_seq" => Some(fields.res_seq.to_string()),
                "occupancy" => Some(fields.occupancy.to_string()),
                "temp_factor" => Some(fields.temp_factor.to_string()),
                "element" => Some(fields.element.clone()),
                "charge" => fields.charge.map(|c| c.to_string()),
                _ => None,
            },
            _ => None,
        }
    }
}
