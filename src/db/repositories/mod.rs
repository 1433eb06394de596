mod slots;

pub(crate) use slots::SlotCommand;
