use crate::domain::catalog::{ApplicationType, Process, Profession};
use crate::domain::mapping::ResolvedStep;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct StepRow<'a> {
    sequence: u32,
    process_id: u32,
    name: &'a str,
    path: &'a str,
}

#[derive(Serialize)]
struct ProcessRow<'a> {
    process_id: u32,
    name: &'a str,
    path: &'a str,
}

#[derive(Serialize)]
struct ApplicationTypeRow<'a> {
    application_type_id: u32,
    form_code: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
struct ProfessionRow<'a> {
    profession_id: u32,
    name: &'a str,
}

/// Writes resolved sequences and catalog listings as CSV.
pub struct SequenceWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> SequenceWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// Writes one `sequence,process_id,name,path` row per step.
    ///
    /// The header is written even for an empty sequence.
    pub fn write_steps(&mut self, steps: &[ResolvedStep]) -> Result<()> {
        if steps.is_empty() {
            self.writer
                .write_record(["sequence", "process_id", "name", "path"])?;
        }
        for step in steps {
            self.writer.serialize(StepRow {
                sequence: step.sequence,
                process_id: step.process.id.0,
                name: &step.process.name,
                path: &step.process.path,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_application_types(
        &mut self,
        application_types: &[ApplicationType],
    ) -> Result<()> {
        if application_types.is_empty() {
            self.writer
                .write_record(["application_type_id", "form_code", "name"])?;
        }
        for application_type in application_types {
            self.writer.serialize(ApplicationTypeRow {
                application_type_id: application_type.id.0,
                form_code: &application_type.form_code,
                name: &application_type.name,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_processes(&mut self, processes: &[Process]) -> Result<()> {
        if processes.is_empty() {
            self.writer.write_record(["process_id", "name", "path"])?;
        }
        for process in processes {
            self.writer.serialize(ProcessRow {
                process_id: process.id.0,
                name: &process.name,
                path: &process.path,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_professions(&mut self, professions: &[Profession]) -> Result<()> {
        if professions.is_empty() {
            self.writer.write_record(["profession_id", "name"])?;
        }
        for profession in professions {
            self.writer.serialize(ProfessionRow {
                profession_id: profession.id.0,
                name: &profession.name,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
