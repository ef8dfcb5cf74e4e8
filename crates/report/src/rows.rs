use csv::Writer;
use serde::Serialize;

use engine::{ItemId, Snapshot};

use crate::{ReportError, Section};

#[derive(Serialize)]
struct Row {
    section: Section,
    item: &'static str,
    label: &'static str,
    amount: f64,
    locked: bool,
}

/// One row per item, in report order.
pub(crate) fn render(snapshot: &Snapshot) -> Result<String, ReportError> {
    let mut writer = Writer::from_writer(vec![]);
    for item in ItemId::ALL {
        writer.serialize(Row {
            section: Section::of(item),
            item: item.as_str(),
            label: item.label(),
            amount: snapshot.value(item),
            locked: snapshot.is_locked(item),
        })?;
    }
    let data = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8(data)?)
}
