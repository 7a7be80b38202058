//! Shared test documents for integration tests.

#![allow(dead_code)]

/// A class-level annotation with lists, a month and custom data.
pub const FISHER_REFERENCE: &str = r#"@Reference(
	type = ReferenceType.Inproceedings,
	author = { "Perronnin, F.", "Dance, C." },
	title = "Fisher Kernels on Visual Vocabularies for Image Categorization",
	year = "2007",
	booktitle = "Computer Vision and Pattern Recognition, 2007. CVPR '07. IEEE Conference on",
	pages = { "1", "8" },
	month = "June",
	customData = {
		"doi", "10.1109/CVPR.2007.383266",
		"issn", "1063-6919"
	}
)"#;

/// The class description section of a javadoc page for an annotated class.
///
/// Annotation names are hyperlinked and quotes are entity-encoded, as the
/// javadoc tool emits them.
pub const JAVADOC_PAGE: &str = r#"<div class="description">
<ul class="blockList">
<li class="blockList">
<hr>
<br>
<pre><a href="../../../../org/openimaj/citation/annotation/Reference.html" title="annotation in org.openimaj.citation.annotation">@Reference</a>(<a href="../../../../org/openimaj/citation/annotation/Reference.html#type()">type</a>=<a href="../../../../org/openimaj/citation/annotation/ReferenceType.html#Inproceedings">Inproceedings</a>,
           <a href="../../../../org/openimaj/citation/annotation/Reference.html#author()">author</a>={&quot;Perronnin, F.&quot;,&quot;Dance, C.&quot;},
           <a href="../../../../org/openimaj/citation/annotation/Reference.html#title()">title</a>=&quot;Fisher Kernels on Visual Vocabularies for Image Categorization&quot;,
           <a href="../../../../org/openimaj/citation/annotation/Reference.html#year()">year</a>=&quot;2007&quot;,
           <a href="../../../../org/openimaj/citation/annotation/Reference.html#booktitle()">booktitle</a>=&quot;Computer Vision and Pattern Recognition, 2007. CVPR &#39;07. IEEE Conference on&quot;,
           <a href="../../../../org/openimaj/citation/annotation/Reference.html#pages()">pages</a>={&quot;1&quot;,&quot;8&quot;})
public class <span class="strong">FisherVector&lt;T&gt;</span>
extends java.lang.Object</pre>
<div class="block">Implementation of the Fisher Vector (FV) encoding scheme.</div>
</li>
</ul>
</div>"#;

/// A document with one valid list block, one malformed block and one valid
/// single block.
pub const MIXED_DOCUMENT: &str = r#"@References(references={
	@Reference(type=ReferenceType.Article, author={"Smith, John"}, title="First", year="2001"),
	@Reference(type=ReferenceType.Book, author={"Doe, Jane"}, title="Second", year="2002")
})
public class Mixed {

	@Reference(type=ReferenceType.Article, title="No year")
	public void broken() {}

	@Reference(type=ReferenceType.Misc, title="Third", year="2003")
	public void works() {}
}
"#;
