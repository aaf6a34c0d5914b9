pub(crate) mod answer_files;
pub(crate) mod storage;
pub(crate) mod visibility;
